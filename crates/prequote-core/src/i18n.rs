//! # Language Packs
//!
//! Every fixed string of an exported quotation, plus the user-facing
//! persistence failure messages, in the four supported languages.

use crate::types::Language;

/// All translatable text for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguagePack {
    pub pre_quotation: &'static str,
    pub code: &'static str,
    pub reference: &'static str,
    pub date: &'static str,
    pub client_info: &'static str,
    pub name: &'static str,
    pub brand: &'static str,
    pub email: &'static str,
    pub our_ref: &'static str,
    pub client_ref: &'static str,
    pub sample_size: &'static str,
    pub description: &'static str,
    pub materials_list: &'static str,
    pub supplier: &'static str,
    pub unit_price: &'static str,
    pub consumption: &'static str,
    pub line_total: &'static str,
    pub prices_by_quantity: &'static str,
    pub quantity: &'static str,
    pub price_per_unit: &'static str,
    pub extra_costs: &'static str,
    pub moq_quantity: &'static str,
    pub cost: &'static str,
    pub margin: &'static str,
    pub total_with_margin: &'static str,
    pub generated_on: &'static str,
    pub page: &'static str,

    /// ASCII label used in the download file name.
    pub file_label: &'static str,

    /// First three legal lines; the contact line is built by [`LanguagePack::footer`].
    pub footer_terms: [&'static str; 3],
    pub footer_contact: &'static str,

    pub save_failed: &'static str,
    pub delete_failed: &'static str,
    pub load_failed: &'static str,
    pub not_found: &'static str,
}

impl LanguagePack {
    /// The four legal footer lines, ending with the contact address.
    pub fn footer(&self, contact_email: &str) -> [String; 4] {
        [
            self.footer_terms[0].to_string(),
            self.footer_terms[1].to_string(),
            self.footer_terms[2].to_string(),
            format!("{} {}", self.footer_contact, contact_email),
        ]
    }
}

/// Returns the pack for a language.
pub fn pack(language: Language) -> &'static LanguagePack {
    match language {
        Language::Pt => &PT,
        Language::En => &EN,
        Language::Fr => &FR,
        Language::Es => &ES,
    }
}

static PT: LanguagePack = LanguagePack {
    pre_quotation: "Pré-Cotação",
    code: "Código",
    reference: "Referência",
    date: "Data",
    client_info: "Informação do Cliente",
    name: "Nome",
    brand: "Marca",
    email: "Email",
    our_ref: "Nossa Ref",
    client_ref: "Ref Cliente",
    sample_size: "Tamanho Amostra",
    description: "Descrição",
    materials_list: "Lista de Materiais",
    supplier: "Fornecedor",
    unit_price: "Preço Unitário",
    consumption: "Consumo",
    line_total: "Total",
    prices_by_quantity: "Preços por Quantidade",
    quantity: "Quantidade",
    price_per_unit: "Preço por Unidade",
    extra_costs: "Custos Extra (MOQ)",
    moq_quantity: "Qtd. MOQ",
    cost: "Custo",
    margin: "Margem",
    total_with_margin: "Total c/ Margem",
    generated_on: "Gerado em",
    page: "Página",
    file_label: "Pre-Cotacao",
    footer_terms: [
        "Esta oferta é baseada nos nossos TERMOS E CONDIÇÕES.",
        "Preços sem IVA",
        "Preços Ex Works",
    ],
    footer_contact: "Para mais informações, contacte o seu gestor de conta ou",
    save_failed: "Não foi possível guardar. Tente novamente.",
    delete_failed: "Não foi possível eliminar. Tente novamente.",
    load_failed: "Não foi possível carregar os dados. Tente novamente.",
    not_found: "Registo não encontrado.",
};

static EN: LanguagePack = LanguagePack {
    pre_quotation: "Pre-Quotation",
    code: "Code",
    reference: "Reference",
    date: "Date",
    client_info: "Client Information",
    name: "Name",
    brand: "Brand",
    email: "Email",
    our_ref: "Our Ref",
    client_ref: "Client Ref",
    sample_size: "Sample Size",
    description: "Description",
    materials_list: "Materials List",
    supplier: "Supplier",
    unit_price: "Unit Price",
    consumption: "Consumption",
    line_total: "Total",
    prices_by_quantity: "Prices by Quantity",
    quantity: "Quantity",
    price_per_unit: "Price per Unit",
    extra_costs: "Extra Costs (MOQ)",
    moq_quantity: "MOQ Qty",
    cost: "Cost",
    margin: "Margin",
    total_with_margin: "Total w/ Margin",
    generated_on: "Generated on",
    page: "Page",
    file_label: "Pre-Quotation",
    footer_terms: [
        "This offer is based on our TERMS AND CONDITIONS.",
        "Prices exclude VAT",
        "Prices Ex Works",
    ],
    footer_contact: "For more information, please contact your account manager or",
    save_failed: "Could not save. Please try again.",
    delete_failed: "Could not delete. Please try again.",
    load_failed: "Could not load data. Please try again.",
    not_found: "Record not found.",
};

static FR: LanguagePack = LanguagePack {
    pre_quotation: "Pré-Devis",
    code: "Code",
    reference: "Référence",
    date: "Date",
    client_info: "Information Client",
    name: "Nom",
    brand: "Marque",
    email: "Email",
    our_ref: "Notre Réf",
    client_ref: "Réf Client",
    sample_size: "Taille Échantillon",
    description: "Description",
    materials_list: "Liste des Matériaux",
    supplier: "Fournisseur",
    unit_price: "Prix Unitaire",
    consumption: "Consommation",
    line_total: "Total",
    prices_by_quantity: "Prix par Quantité",
    quantity: "Quantité",
    price_per_unit: "Prix par Unité",
    extra_costs: "Coûts Supplémentaires (MOQ)",
    moq_quantity: "Qté MOQ",
    cost: "Coût",
    margin: "Marge",
    total_with_margin: "Total avec Marge",
    generated_on: "Généré le",
    page: "Page",
    file_label: "Pre-Devis",
    footer_terms: [
        "Cette offre est basée sur nos CONDITIONS GÉNÉRALES.",
        "Prix hors TVA",
        "Prix Ex Works",
    ],
    footer_contact: "Pour plus d'informations, contactez votre responsable de compte ou",
    save_failed: "Impossible d'enregistrer. Veuillez réessayer.",
    delete_failed: "Impossible de supprimer. Veuillez réessayer.",
    load_failed: "Impossible de charger les données. Veuillez réessayer.",
    not_found: "Enregistrement introuvable.",
};

static ES: LanguagePack = LanguagePack {
    pre_quotation: "Pre-Cotización",
    code: "Código",
    reference: "Referencia",
    date: "Fecha",
    client_info: "Información del Cliente",
    name: "Nombre",
    brand: "Marca",
    email: "Email",
    our_ref: "Nuestra Ref",
    client_ref: "Ref Cliente",
    sample_size: "Tamaño Muestra",
    description: "Descripción",
    materials_list: "Lista de Materiales",
    supplier: "Proveedor",
    unit_price: "Precio Unitario",
    consumption: "Consumo",
    line_total: "Total",
    prices_by_quantity: "Precios por Cantidad",
    quantity: "Cantidad",
    price_per_unit: "Precio por Unidad",
    extra_costs: "Costos Extra (MOQ)",
    moq_quantity: "Cant. MOQ",
    cost: "Costo",
    margin: "Margen",
    total_with_margin: "Total con Margen",
    generated_on: "Generado el",
    page: "Página",
    file_label: "Pre-Cotizacion",
    footer_terms: [
        "Esta oferta está basada en nuestros TÉRMINOS Y CONDICIONES.",
        "Precios sin IVA",
        "Precios Ex Works",
    ],
    footer_contact: "Para más información, contacte con su gestor de cuenta o",
    save_failed: "No se pudo guardar. Inténtelo de nuevo.",
    delete_failed: "No se pudo eliminar. Inténtelo de nuevo.",
    load_failed: "No se pudieron cargar los datos. Inténtelo de nuevo.",
    not_found: "Registro no encontrado.",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language_is_portuguese() {
        assert_eq!(pack(Language::default()).pre_quotation, "Pré-Cotação");
    }

    #[test]
    fn test_footer_has_four_lines_with_contact() {
        for language in Language::ALL {
            let footer = pack(language).footer("info@lomartex.pt");
            assert!(footer[3].ends_with("info@lomartex.pt"));
            assert!(footer.iter().all(|line| !line.is_empty()));
        }
    }

    #[test]
    fn test_file_labels_are_ascii() {
        assert!(Language::ALL
            .iter()
            .all(|l| pack(*l).file_label.is_ascii()));
    }
}

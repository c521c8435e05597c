//! # Line-Item Commands
//!
//! `POST /api/quotations/{id}/line-items` applies one edit through the
//! Line-Item Store, so the MOQ linkage rule runs server-side, then saves the
//! whole quotation.
//!
//! ## Request Bodies
//! ```json
//! { "op": "add_component", "component": { "description": "Zipper", "unit_price": "0.38", ... } }
//! { "op": "set_has_moq", "id": "c-1", "has_moq": true }
//! { "op": "rename_component", "id": "c-1", "description": "Metal zipper" }
//! { "op": "remove_development", "id": "d-7" }
//! ```
//!
//! A failed command or save leaves the stored quotation untouched.

use axum::extract::{Path, State};
use axum::Json;
use prequote_core::{Component, CoreResult, Development, LineItems, Quotation, QuotationInput};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::quotations::load;
use super::RequestLanguage;
use crate::error::{Action, ApiResult, DbResultExt};
use crate::state::AppState;

/// One edit to a quotation's components or developments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LineItemCommand {
    AddComponent { component: Component },
    UpdateComponent { component: Component },
    RenameComponent { id: String, description: String },
    SetHasMoq { id: String, has_moq: bool },
    RemoveComponent { id: String },
    AddDevelopment { development: Development },
    UpdateDevelopment { development: Development },
    RemoveDevelopment { id: String },
}

impl LineItemCommand {
    /// Applies the command to a line-item store.
    pub fn apply(self, items: &mut LineItems) -> CoreResult<()> {
        match self {
            LineItemCommand::AddComponent { component } => {
                items.add_component(component);
            }
            LineItemCommand::UpdateComponent { component } => items.update_component(component)?,
            LineItemCommand::RenameComponent { id, description } => {
                items.rename_component(&id, description)?
            }
            LineItemCommand::SetHasMoq { id, has_moq } => items.set_has_moq(&id, has_moq)?,
            LineItemCommand::RemoveComponent { id } => {
                items.remove_component(&id)?;
            }
            LineItemCommand::AddDevelopment { development } => {
                items.add_development(development);
            }
            LineItemCommand::UpdateDevelopment { development } => {
                items.update_development(development)?
            }
            LineItemCommand::RemoveDevelopment { id } => {
                items.remove_development(&id)?;
            }
        }
        Ok(())
    }
}

/// `POST /api/quotations/{id}/line-items`
#[instrument(skip(state, command))]
pub async fn apply(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Path(id): Path<String>,
    Json(command): Json<LineItemCommand>,
) -> ApiResult<Json<Quotation>> {
    let quotation = load(&state, &id, lang).await?;
    debug!(id = %id, ?command, "Applying line-item command");

    let mut input = QuotationInput::from(&quotation);
    command.apply(&mut input.items)?;

    let saved = state
        .db
        .quotations()
        .update(&id, &input)
        .await
        .localized(lang, Action::Save)?;
    Ok(Json(saved))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_command_wire_format() {
        let command: LineItemCommand =
            serde_json::from_str(r#"{"op":"set_has_moq","id":"c-1","has_moq":true}"#).unwrap();
        assert!(matches!(
            command,
            LineItemCommand::SetHasMoq { ref id, has_moq: true } if id == "c-1"
        ));
    }

    #[test]
    fn test_toggle_and_inverse_cascade() {
        let mut items = LineItems::new();
        let id = items.add_component(Component::new(
            "Zipper",
            "YKK",
            Decimal::new(38, 2),
            Decimal::ONE,
        ));

        LineItemCommand::SetHasMoq {
            id: id.clone(),
            has_moq: true,
        }
        .apply(&mut items)
        .unwrap();
        let dev_id = items.moq_pair(&id).unwrap().id.clone();
        assert_eq!(items.developments[0].description, "MOQ - Zipper");

        LineItemCommand::RemoveDevelopment { id: dev_id }
            .apply(&mut items)
            .unwrap();
        assert!(!items.components[0].has_moq);
        assert!(items.developments.is_empty());
    }

    #[test]
    fn test_unknown_component_is_an_error() {
        let mut items = LineItems::new();
        let result = LineItemCommand::RemoveComponent {
            id: "missing".to_string(),
        }
        .apply(&mut items);
        assert!(result.is_err());
    }
}

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Healthcare AI Assistant",
        version = "1.0.0",
        description = "Guardrailed healthcare chat assistants and churn prediction"
    ),
    paths(
        // Health
        super::health::root,
        super::health::health,
        super::health::status,
        // Fine-tuned assistant
        super::chat::ask,
        super::chat::send_message,
        super::chat::get_session,
        super::chat::clear_session,
        // Prompt lab
        super::lab::list_techniques,
        super::lab::ask,
        super::lab::send_message,
        super::lab::get_session,
        super::lab::clear_session,
        // Churn
        super::predict::predict_churn,
    ),
    components(schemas(
        // Requests
        crate::models::requests::AskRequest,
        crate::models::requests::LabAskRequest,
        crate::models::requests::CustomerData,
        // Responses
        crate::models::responses::AskResponse,
        crate::models::responses::LabAskResponse,
        crate::models::responses::ChurnPredictionResponse,
        crate::models::responses::TechniquesResponse,
        crate::models::responses::TranscriptResponse,
        crate::models::responses::ClearSessionResponse,
        crate::models::responses::ServiceHealth,
        crate::models::responses::HealthResponse,
        crate::models::responses::StatusResponse,
        crate::models::responses::SystemStatistics,
        // Entities
        crate::models::entities::PromptStrategy,
        crate::models::entities::ChurnLabel,
        crate::models::entities::TenureGroup,
        crate::models::entities::TranscriptEntry,
        // Error
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Health", description = "Health and status endpoints"),
        (name = "Assistant", description = "Fine-tuned healthcare assistant"),
        (name = "Prompt Lab", description = "Hosted model with selectable prompting techniques"),
        (name = "Churn", description = "Customer churn prediction"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/explore").url("/api-docs/openapi.json", ApiDoc::openapi())
}

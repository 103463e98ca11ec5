//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use promptgen::{ChangeKind, PromptChange, PromptRecord, PromptStatus};

use crate::models::{CreatePromptRequest, CreatePromptResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::prompt::create_prompt,
        super::prompt::list_prompts,
        super::prompt::list_all_prompts,
        super::prompt::get_prompt,
        super::prompt::delete_prompt,
        super::subscription::subscribe_prompts,
    ),
    components(schemas(
        CreatePromptRequest,
        CreatePromptResponse,
        PromptRecord,
        PromptStatus,
        PromptChange,
        ChangeKind,
    )),
    info(
        title = "Prompt Generator API",
        version = "0.1.0",
        description = "Turns a task description into a ready-to-use prompt.\n\nGeneration runs asynchronously; poll a record or subscribe to follow its status.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Prompt", description = "Prompt - Submission, records and live changes"),
    )
)]
pub struct ApiDoc;

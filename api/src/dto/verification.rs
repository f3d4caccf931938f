use serde::{Deserialize, Serialize};
use validator::Validate;

/// `POST /verification`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StartVerificationRequest {
    /// Phone number in E.164 format, e.g. "+15551234567"
    #[validate(required, length(min = 1))]
    pub phone: Option<String>,
}

/// `POST /check-code`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CheckCodeRequest {
    #[validate(required, length(min = 1))]
    pub request_id: Option<String>,

    /// Code obtained from the silent-auth check URL or typed from the SMS
    #[validate(required, length(min = 1))]
    pub code: Option<String>,
}

impl CheckCodeRequest {
    /// Fields in the order a missing one is reported
    pub const FIELDS: [&'static str; 2] = ["request_id", "code"];
}

/// `POST /next`
///
/// The mobile client sends `requestId`; `request_id` is accepted too.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NextWorkflowRequest {
    #[serde(rename = "requestId", alias = "request_id")]
    #[validate(required, length(min = 1))]
    pub request_id: Option<String>,
}

use serde::{Deserialize, Serialize};

use super::text_enum;

text_enum!(ChatRole, "chat role", {
    User => "user",
    Assistant => "assistant",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

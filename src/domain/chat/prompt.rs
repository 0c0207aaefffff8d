use super::model::{ChatMessage, SearchDocument};

pub const NO_DOCUMENTS_CONTEXT: &str = "No specific training documents found for this query.";

const ASSISTANT_INSTRUCTIONS: &str = "You are a helpful and professional staff training assistant for DigiRestro Supply Chain Management. Your job is to guide new and existing employees through business workflows and best practices. Be clear, encouraging, and patient.
- Explain processes clearly and encourage best practices.
- Offer practical advice, tips, and clarifications as needed.
- Maintain a friendly, professional, and supportive tone.
- If a question is unclear or missing context, ask polite clarifying questions.
- Tailor your response to the user's experience level when possible.
- Format responses using **bold**, *italic*, bullet points, and clear headings for better readability.
- Always ensure the information you provide is accurate and actionable.
";

/// Render search hits as numbered "Training Document" blocks.
pub fn build_context(documents: &[SearchDocument]) -> String {
    if documents.is_empty() {
        return NO_DOCUMENTS_CONTEXT.to_string();
    }

    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| {
            let mut block = format!("Training Document {}:\n", i + 1);
            if !doc.title.is_empty() {
                block.push_str(&format!("Title: {}\n", doc.title));
            }
            block.push_str(&format!("Content: {}\n\n", doc.content));
            block
        })
        .collect()
}

pub fn build_system_prompt(context: &str) -> String {
    if context.is_empty() {
        ASSISTANT_INSTRUCTIONS.to_string()
    } else {
        format!("{}\nContext: {}", ASSISTANT_INSTRUCTIONS, context)
    }
}

/// System prompt, then replayed history, then the new user message.
pub fn build_messages(
    system_prompt: String,
    history: Vec<ChatMessage>,
    user_message: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(history);
    messages.push(ChatMessage::user(user_message));
    messages
}

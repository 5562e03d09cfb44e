use crate::llm::ChatMessage;

pub const GROUNDED_SYSTEM_PROMPT: &str = "You are an AI assistant that answers questions based on the provided context. \
If the context doesn't contain relevant information to answer the question, admit that you don't know. \
Always cite your sources by referring to the file name when providing information.";

pub const GENERIC_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Chat messages for one question. With context the model is held to it;
/// without, it answers as a general assistant.
pub fn build_messages(question: &str, context: &str) -> Vec<ChatMessage> {
    if context.is_empty() {
        return vec![
            ChatMessage::system(GENERIC_SYSTEM_PROMPT),
            ChatMessage::user(question),
        ];
    }

    vec![
        ChatMessage::system(GROUNDED_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Context information is below:\n\n{context}\n\nQuestion: {question}\n\nAnswer the question based on the context provided."
        )),
    ]
}

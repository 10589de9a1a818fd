//! Starter content for newly created bots.

use botsmith_types::bot::{BotConfig, IntentDraft};

/// Name of the bot seeded for a user with no stored bots.
pub const STARTER_BOT_NAME: &str = "Abstract AI";

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The six intents every new bot starts with.
pub fn starter_intents() -> Vec<IntentDraft> {
    vec![
        IntentDraft::new(
            "Greeting",
            phrases(&[
                "Hi",
                "Hello",
                "Hey there",
                "Good morning",
                "Good afternoon",
                "Hey, how’s it going?",
                "Hi assistant",
                "Hello bot",
            ]),
            "Hi there! 👋 How can I assist you today?",
        ),
        IntentDraft::new(
            "Goodbye",
            phrases(&[
                "Bye",
                "Goodbye",
                "See you later",
                "Take care",
                "Talk to you soon",
                "Catch you later",
                "Thanks, bye",
            ]),
            "Goodbye! 👋 Have a great day.",
        ),
        IntentDraft::new(
            "Opening Hours",
            phrases(&[
                "What are your hours?",
                "When are you open?",
                "Opening times",
                "What time do you close?",
                "Are you open on weekends?",
                "Tell me your business hours",
            ]),
            "We are open from 9 AM to 5 PM, Monday to Friday. 🕘",
        ),
        IntentDraft::new(
            "Knowledge Lookup",
            phrases(&[
                "Can you find information about {topic}?",
                "Tell me about {topic}",
                "What does the document say about {topic}?",
                "Look up {topic}",
                "Do you have details on {topic}?",
            ]),
            "Sure, let me check the knowledge base for \"{topic}\" 🔍",
        ),
        IntentDraft::new(
            "Clarification",
            phrases(&[
                "I don't understand",
                "Can you clarify?",
                "What do you mean?",
                "Please explain",
                "That’s not clear",
            ]),
            "Of course! Could you rephrase or give me more details?",
        ),
        // No phrases: the classifier picks it when nothing else fits.
        IntentDraft::new(
            "Fallback",
            Vec::new(),
            "I'm not sure I understand 🤔. Would you like me to search the knowledge base for you?",
        ),
    ]
}

/// A new bot with the default theme, default response and starter intents.
pub fn new_bot(name: &str) -> BotConfig {
    let mut bot = BotConfig::new(name, Vec::new());
    bot.append_intents(starter_intents());
    bot
}

/// The fixed set of simulated commenters. Bots author comments server-side
/// after a user action; the client only learns about them through a
/// reconciling re-fetch of the comment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotPersona {
    pub name: &'static str,
    pub glyph: &'static str,
}

pub const BOT_PERSONAS: [BotPersona; 6] = [
    BotPersona { name: "하이프봇3000", glyph: "🤖" },
    BotPersona { name: "질투AI", glyph: "😤" },
    BotPersona { name: "캡틴과장러", glyph: "📊" },
    BotPersona { name: "아첨꾼2.0", glyph: "✨" },
    BotPersona { name: "축하봇", glyph: "🎉" },
    BotPersona { name: "의심킹", glyph: "🤔" },
];

impl BotPersona {
    pub fn by_name(name: &str) -> Option<&'static BotPersona> {
        BOT_PERSONAS.iter().find(|p| p.name == name)
    }
}

/// Display glyph for a bot name, with the generic robot as fallback for
/// personas this client build does not know about.
pub fn glyph_for(bot_name: &str) -> &'static str {
    BotPersona::by_name(bot_name).map(|p| p.glyph).unwrap_or("🤖")
}

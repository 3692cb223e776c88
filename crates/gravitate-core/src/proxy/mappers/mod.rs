// Protocol mappers
pub mod claude;
pub mod gemini;

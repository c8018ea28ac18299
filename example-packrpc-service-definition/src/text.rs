pub const PAIR: &str = "pair";
pub const ECHO: &str = "echo";

/// Ignores its input and returns two values.
pub async fn pair(_input: String) -> (String, i64) {
    ("x".to_string(), 7)
}

pub async fn echo(text: String) -> String {
    text
}

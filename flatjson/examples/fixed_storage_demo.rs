// Example parsing into caller-owned token storage, without allocation

use flatjson::{ParseError, Parser, SliceScratch, Token, ValueType};

fn main() {
    let json = r#"{"sensor": "t\u00e9mp", "readings": [21.5, 21.7, 22.0, 22.4]}"#;

    // Too small: the root, two members and four readings need 8 slots
    let mut storage = [Token::EMPTY; 6];
    let mut parser = Parser::with_storage(&mut storage);
    match parser.try_parse(json) {
        Err(ParseError::OutOfTokens { capacity }) => {
            println!("Out of tokens at capacity {capacity}, stopped at byte {}", parser.parsed_len())
        }
        other => println!("Unexpected: {other:?}"),
    }

    let mut storage = [Token::EMPTY; 8];
    let mut parser = Parser::with_storage(&mut storage);
    if let Err(e) = parser.try_parse(json) {
        println!("Parse failed: {e}");
        return;
    }

    let mut buf = [0u8; 32];
    let mut scratch = SliceScratch::new(&mut buf);
    for (idx, token) in parser.iter() {
        let text = match token.value_type() {
            ValueType::Object | ValueType::Array => format!("{} children", token.children()),
            _ => match parser.token_string(idx, &mut scratch) {
                Ok(text) => text.to_string(),
                Err(e) => format!("<{e}>"),
            },
        };
        println!("#{idx} parent {} {}: {text}", token.parent, token.value_type());
    }
}

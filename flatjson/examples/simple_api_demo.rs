// Example walking a parsed document with the heap-backed parser

use flatjson::{Parser, TokenIndex, Value, ROOT};

fn print_value(parser: &Parser<'_, '_, flatjson::VecGrowth>, idx: TokenIndex) {
    let mut scratch: Vec<u8> = Vec::new();
    let indent = "  ".repeat(parser.depth(idx));
    let token = parser.token(idx);
    let name = match parser.token_name(idx, &mut scratch) {
        Ok(name) if token.name.is_some() => format!("{name}: "),
        Ok(_) => String::new(),
        Err(e) => format!("<{e}>: "),
    };
    match token.value {
        Value::Object(_) | Value::Array(_) => {
            println!("{indent}{name}{} ({} children)", token.value_type(), token.children());
            for (child, _) in parser.children(idx) {
                print_value(parser, child);
            }
        }
        _ => match parser.token_string(idx, &mut scratch) {
            Ok(text) => println!("{indent}{name}{text}"),
            Err(e) => println!("{indent}{name}<{e}>"),
        },
    }
}

fn main() {
    let json = r#"{"name": "value", "number": 42, "flag": true, "list": [1, "two\tescaped", null]}"#;
    let mut parser = Parser::new();
    println!("Input: {}", json);

    if let Err(e) = parser.try_parse(json) {
        println!("Parse failed: {e}");
        return;
    }
    println!("{} tokens, capacity {}", parser.last(), parser.capacity());
    print_value(&parser, ROOT);
}

// SPDX-License-Identifier: Apache-2.0

//! Per-type statistics over a token array.

use core::fmt;

use flatjson::{Token, ValueType};

/// Statistics about the values of one type.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypeStats {
    /// Number of values
    pub count: u32,
    /// Total size: bytes for numbers and strings, children for containers
    pub size: usize,
    pub min_size: Option<usize>,
    pub max_size: usize,
    /// Number of values that are object members
    pub named: u32,
    pub name_size: usize,
    pub name_min: Option<usize>,
    pub name_max: usize,
    pub name_escaped: u32,
    pub value_escaped: u32,
}

impl TypeStats {
    fn record(&mut self, token: &Token) {
        self.count += 1;

        if let Some(name) = token.name {
            self.named += 1;
            self.name_size += name.len;
            self.name_min = Some(self.name_min.map_or(name.len, |m| m.min(name.len)));
            self.name_max = self.name_max.max(name.len);
            self.name_escaped += u32::from(name.escaped);
        }

        let size = match token.value_type() {
            ValueType::None | ValueType::Null => 0,
            ValueType::Bool => 1,
            ValueType::Number | ValueType::String => {
                let span = token.value.span().unwrap_or_default();
                self.value_escaped += u32::from(span.escaped);
                span.len
            }
            ValueType::Object | ValueType::Array => token.children() as usize,
        };
        self.size += size;
        self.min_size = Some(self.min_size.map_or(size, |m| m.min(size)));
        self.max_size = self.max_size.max(size);
    }
}

/// Rounded average, 0 for no samples.
fn mean(total: usize, count: u32) -> usize {
    if count == 0 {
        return 0;
    }
    (total as f64 / f64::from(count) + 0.5) as usize
}

/// Accumulated statistics for every value type.
#[derive(Debug, Default, Clone)]
pub struct Stats {
    types: [TypeStats; ValueType::ALL.len()],
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect<'t>(tokens: impl IntoIterator<Item = &'t Token>) -> Self {
        let mut stats = Self::new();
        for token in tokens {
            stats.record(token);
        }
        stats
    }

    pub fn record(&mut self, token: &Token) {
        self.types[token.value_type() as usize].record(token);
    }

    pub fn get(&self, value_type: ValueType) -> &TypeStats {
        &self.types[value_type as usize]
    }

    /// Types that occurred at least once, with their statistics.
    fn present(&self) -> impl Iterator<Item = (ValueType, &TypeStats)> {
        ValueType::ALL
            .into_iter()
            .zip(&self.types)
            .filter(|(ty, stats)| *ty != ValueType::None && stats.count != 0)
    }

    /// Total number of values, and how many of them are named.
    pub fn totals(&self) -> (u32, u32) {
        self.present()
            .fold((0, 0), |(count, named), (_, s)| (count + s.count, named + s.named))
    }

    /// Writes the size table, followed by the escape table if any name or
    /// value contains escapes.
    pub fn render<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let mut first = true;
        for (ty, s) in self.present() {
            if first {
                writeln!(out, " JSON   | Total    | Named    |         Name          |         Size")?;
                writeln!(out, " Type   | Count    | Count    | Min    Average   Max  |  Min   Average   Max")?;
                writeln!(out, "--------+----------+----------+-------+-------+-------+-------+-------+-------")?;
                first = false;
            }
            writeln!(
                out,
                "{:>7} | {:>8} | {:>8} | {:>5} | {:>5} | {:>5} | {:>5} | {:>5} | {:>5}",
                ty.as_str(),
                s.count,
                s.named,
                s.name_min.unwrap_or(0),
                mean(s.name_size, s.named),
                s.name_max,
                s.min_size.unwrap_or(0),
                mean(s.size, s.count),
                s.max_size
            )?;
        }
        let (total, named) = self.totals();
        writeln!(out, "--------+----------+----------+")?;
        writeln!(out, " Total: | {total:>8} | {named:>8} ")?;

        let mut first = true;
        for (ty, s) in self.present() {
            if s.name_escaped == 0 && s.value_escaped == 0 {
                continue;
            }
            if first {
                writeln!(out, "\n")?;
                writeln!(out, " JSON   | Total    | Named    | Escaped  | Escaped")?;
                writeln!(out, " Type   | Count    | Count    | Name     | Value")?;
                writeln!(out, "--------+----------+----------+----------+----------")?;
                first = false;
            }
            writeln!(
                out,
                "{:>7} | {:>8} | {:>8} | {:>8} | {:>8}",
                ty.as_str(),
                s.count,
                s.named,
                s.name_escaped,
                s.value_escaped
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatjson::Parser;

    fn stats_of(json: &str) -> Stats {
        let mut storage = [Token::EMPTY; 32];
        let mut parser = Parser::with_storage(&mut storage);
        assert!(parser.parse(json), "{json}");
        Stats::collect(parser.iter().map(|(_, token)| token))
    }

    #[test]
    fn test_counts_and_sizes() {
        let stats = stats_of(r#"{"a":[1,"xy\tz",-10],"bcd":true,"e":"","f":null}"#);
        let numbers = stats.get(ValueType::Number);
        assert_eq!(numbers.count, 2);
        assert_eq!((numbers.min_size, numbers.max_size), (Some(1), 3));
        assert_eq!(numbers.named, 0);

        let strings = stats.get(ValueType::String);
        assert_eq!(strings.count, 2);
        assert_eq!(strings.size, 5);
        assert_eq!(strings.min_size, Some(0));
        assert_eq!(strings.value_escaped, 1);
        assert_eq!(strings.named, 1);

        let objects = stats.get(ValueType::Object);
        assert_eq!((objects.count, objects.size), (1, 4));
        assert_eq!(objects.named, 0);

        let arrays = stats.get(ValueType::Array);
        assert_eq!(arrays.size, 3);
        assert_eq!((arrays.named, arrays.name_min), (1, Some(1)));

        assert_eq!(stats.get(ValueType::Bool).name_max, 3);
        assert_eq!(stats.get(ValueType::None).count, 0);
        assert_eq!(stats.totals(), (8, 4));
    }

    #[test]
    fn test_mean_rounds() {
        assert_eq!(mean(0, 0), 0);
        assert_eq!(mean(5, 2), 3);
        assert_eq!(mean(4, 3), 1);
    }

    #[test]
    fn test_render_tables() {
        let stats = stats_of(r#"{"k\"ey":[1,22]}"#);
        let mut out = String::new();
        stats.render(&mut out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], " JSON   | Total    | Named    |         Name          |         Size");
        assert_eq!(lines[3], " number |        2 |        0 |     0 |     0 |     0 |     1 |     2 |     2");
        assert_eq!(lines[4], " object |        1 |        0 |     0 |     0 |     0 |     1 |     1 |     1");
        assert_eq!(lines[5], "  array |        1 |        1 |     5 |     5 |     5 |     2 |     2 |     2");
        assert_eq!(lines[7], " Total: |        4 |        1 ");
        assert_eq!(lines[13], "  array |        1 |        1 |        1 |        0");
        assert_eq!(lines.len(), 14);
    }

    #[test]
    fn test_render_without_escapes_has_one_table() {
        let stats = stats_of("[true]");
        let mut out = String::new();
        stats.render(&mut out).unwrap();
        assert!(!out.contains("Escaped"));
        assert!(out.ends_with(" Total: |        2 |        0 \n"));
    }
}

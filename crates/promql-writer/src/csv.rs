//! Minimal RFC 4180 style record writer.

const SPECIAL: &[char] = &[',', '"', '\r', '\n'];

#[derive(Debug, Default)]
pub(crate) struct CsvWriter {
    buf: String,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record terminated by `\n`
    pub fn write_record<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            self.write_field(field.as_ref());
        }
        self.buf.push('\n');
    }

    fn write_field(&mut self, field: &str) {
        if !needs_quotes(field) {
            self.buf.push_str(field);
            return;
        }

        self.buf.push('"');
        for c in field.chars() {
            if c == '"' {
                self.buf.push_str("\"\"");
            } else {
                self.buf.push(c);
            }
        }
        self.buf.push('"');
    }

    pub fn into_inner(self) -> String {
        self.buf
    }
}

fn needs_quotes(field: &str) -> bool {
    if field.is_empty() {
        return false;
    }
    // a lone `\.` is an end-of-data marker for some readers
    field == r"\." || field.contains(SPECIAL) || field.starts_with(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields() {
        let mut w = CsvWriter::new();
        w.write_record(["a", "", "1.5"]);
        w.write_record(["b", "x", "2"]);
        assert_eq!(w.into_inner(), "a,,1.5\nb,x,2\n");
    }

    #[test]
    fn quotes_special_fields() {
        let mut w = CsvWriter::new();
        w.write_record(["a,b", "say \"hi\"", " lead", "multi\nline"]);
        assert_eq!(
            w.into_inner(),
            "\"a,b\",\"say \"\"hi\"\"\",\" lead\",\"multi\nline\"\n"
        );
    }
}

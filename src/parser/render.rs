use std::fmt;

use super::Document;

impl Document {
    /// Serialize back to file text. Untouched lines come out byte-for-byte
    /// as they were read, terminators included.
    pub fn render(&self) -> String {
        let capacity = self
            .lines()
            .iter()
            .map(|l| l.raw().len() + l.ending().as_str().len())
            .sum();
        let mut out = String::with_capacity(capacity);
        for line in self.lines() {
            out.push_str(line.raw());
            out.push_str(line.ending().as_str());
        }
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_is_exact() {
        let inputs = [
            "",
            "\n",
            "no trailing newline",
            "#@# \n  alacritty   # terminal  \n\n\t#- dmenu\n#@+^\n",
            "mixed\r\nendings\nhere\r\n",
            "{ pkgs, ... }: #@\n  /* odd */ thing\n  #@# not hex\n} #@",
        ];

        for input in inputs {
            let doc = Document::parse(input).unwrap();
            assert_eq!(doc.render(), input);
            assert_eq!(doc.to_string(), input);
        }
    }
}

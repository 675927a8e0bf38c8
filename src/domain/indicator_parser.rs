//! Indicator notation parser.
//!
//! Parses `SMA(20)`, `EMA(12)`, `RSI(14)`, `RSI` (default period),
//! `MACD(12,26,9)` and `MACD` (defaults), alone or as a comma-separated list
//! such as `RSI(14), MACD(12,26,9), SMA(20)`. Errors carry the character
//! offset of the offending token.

use crate::domain::error::ParseError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator::{macd, rsi};
use std::str::FromStr;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.peek().is_none()
    }

    fn consume_char(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError {
                message: format!("expected '{}', found '{}'", expected, ch),
                position: self.pos,
            }),
            None => Err(ParseError {
                message: format!("expected '{}', found end of input", expected),
                position: self.pos,
            }),
        }
    }

    fn parse_word(&mut self) -> String {
        self.skip_whitespace();
        let mut word = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        word
    }

    fn parse_period(&mut self) -> Result<usize, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let digits = &self.input[start..self.pos];
        if digits.is_empty() {
            let found = self
                .peek()
                .map(|c| format!("'{}'", c))
                .unwrap_or_else(|| "end of input".to_string());
            return Err(ParseError {
                message: format!("expected integer, found {}", found),
                position: start,
            });
        }

        let period = digits.parse::<usize>().map_err(|_| ParseError {
            message: format!("invalid integer: {}", digits),
            position: start,
        })?;
        if period == 0 {
            return Err(ParseError {
                message: "period must be positive".to_string(),
                position: start,
            });
        }
        Ok(period)
    }

    fn parse_indicator(&mut self) -> Result<IndicatorType, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let name = self.parse_word().to_ascii_uppercase();

        match name.as_str() {
            "SMA" | "EMA" => {
                self.expect_char('(')?;
                let period = self.parse_period()?;
                self.expect_char(')')?;
                Ok(if name == "SMA" {
                    IndicatorType::Sma(period)
                } else {
                    IndicatorType::Ema(period)
                })
            }
            "RSI" => {
                if !self.consume_char('(') {
                    return Ok(IndicatorType::Rsi(rsi::DEFAULT_PERIOD));
                }
                let period = self.parse_period()?;
                self.expect_char(')')?;
                Ok(IndicatorType::Rsi(period))
            }
            "MACD" => {
                if !self.consume_char('(') {
                    return Ok(IndicatorType::Macd {
                        fast: macd::DEFAULT_FAST,
                        slow: macd::DEFAULT_SLOW,
                        signal: macd::DEFAULT_SIGNAL,
                    });
                }
                let fast = self.parse_period()?;
                self.expect_char(',')?;
                let slow_pos = {
                    self.skip_whitespace();
                    self.pos
                };
                let slow = self.parse_period()?;
                self.expect_char(',')?;
                let signal = self.parse_period()?;
                self.expect_char(')')?;
                if fast >= slow {
                    return Err(ParseError {
                        message: format!(
                            "MACD slow period ({}) must exceed fast period ({})",
                            slow, fast
                        ),
                        position: slow_pos,
                    });
                }
                Ok(IndicatorType::Macd { fast, slow, signal })
            }
            "" => Err(ParseError {
                message: match self.peek() {
                    Some(ch) => format!("expected indicator name, found '{}'", ch),
                    None => "expected indicator name, found end of input".to_string(),
                },
                position: start,
            }),
            other => Err(ParseError {
                message: format!(
                    "unknown indicator '{}' (expected SMA, EMA, RSI, MACD)",
                    other
                ),
                position: start,
            }),
        }
    }

    fn parse_list(&mut self) -> Result<Vec<IndicatorType>, ParseError> {
        let mut indicators = vec![self.parse_indicator()?];
        while self.consume_char(',') {
            indicators.push(self.parse_indicator()?);
        }
        self.expect_end()?;
        Ok(indicators)
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(ParseError {
                message: format!("unexpected trailing input '{}'", self.remaining()),
                position: self.pos,
            })
        }
    }
}

/// Parse a single indicator such as `MACD(12,26,9)`.
pub fn parse(input: &str) -> Result<IndicatorType, ParseError> {
    let mut parser = Parser::new(input);
    let indicator = parser.parse_indicator()?;
    parser.expect_end()?;
    Ok(indicator)
}

/// Parse a comma-separated indicator list.
pub fn parse_list(input: &str) -> Result<Vec<IndicatorType>, ParseError> {
    Parser::new(input).parse_list()
}

impl FromStr for IndicatorType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_indicators() {
        assert_eq!(parse("SMA(20)").unwrap(), IndicatorType::Sma(20));
        assert_eq!(parse("EMA(12)").unwrap(), IndicatorType::Ema(12));
        assert_eq!(parse("RSI(7)").unwrap(), IndicatorType::Rsi(7));
    }

    #[test]
    fn parse_macd() {
        assert_eq!(
            parse("MACD(5, 35, 5)").unwrap(),
            IndicatorType::Macd {
                fast: 5,
                slow: 35,
                signal: 5
            }
        );
    }

    #[test]
    fn parse_defaults_without_parens() {
        assert_eq!(parse("RSI").unwrap(), IndicatorType::Rsi(14));
        assert_eq!(
            parse("MACD").unwrap(),
            IndicatorType::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
        );
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(parse("sma(50)").unwrap(), IndicatorType::Sma(50));
    }

    #[test]
    fn parse_round_trips_display() {
        for text in ["SMA(20)", "EMA(26)", "RSI(14)", "MACD(12,26,9)"] {
            assert_eq!(parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn parse_list_with_whitespace() {
        let list = parse_list(" RSI(14) ,MACD(12,26,9), SMA(20) ").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0], IndicatorType::Rsi(14));
        assert_eq!(list[2], IndicatorType::Sma(20));
    }

    #[test]
    fn from_str_uses_parser() {
        let indicator: IndicatorType = "EMA(9)".parse().unwrap();
        assert_eq!(indicator, IndicatorType::Ema(9));
    }

    #[test]
    fn error_unknown_indicator() {
        let err = parse("WMA(10)").unwrap_err();
        assert_eq!(err.position, 0);
        assert!(err.message.contains("unknown indicator 'WMA'"));
    }

    #[test]
    fn error_missing_paren() {
        let err = parse("SMA(20").unwrap_err();
        assert_eq!(err.position, 6);
        assert!(err.message.contains("expected ')'"));
    }

    #[test]
    fn error_zero_period() {
        let err = parse("SMA(0)").unwrap_err();
        assert_eq!(err.position, 4);
        assert!(err.message.contains("positive"));
    }

    #[test]
    fn error_macd_fast_not_below_slow() {
        let err = parse("MACD(26,12,9)").unwrap_err();
        assert_eq!(err.position, 8);
    }

    #[test]
    fn error_trailing_input() {
        let err = parse("SMA(20) x").unwrap_err();
        assert_eq!(err.position, 8);
    }

    #[test]
    fn error_empty_list_entry() {
        let err = parse_list("SMA(20),,RSI").unwrap_err();
        assert_eq!(err.position, 8);
    }

    #[test]
    fn error_empty_input() {
        let err = parse("").unwrap_err();
        assert!(err.message.contains("end of input"));
    }
}

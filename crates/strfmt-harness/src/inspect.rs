//! Serializable view of a compiled format, for the `compile` subcommand
//! and for debugging fixture failures.

use serde::Serialize;
use strfmt_core::{CompiledFormat, Token, Verb};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenView {
    pub kind: &'static str,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledView {
    pub required_args: usize,
    pub min_output_size: usize,
    pub tokens: Vec<TokenView>,
}

impl CompiledView {
    #[must_use]
    pub fn new(compiled: &CompiledFormat) -> Self {
        Self {
            required_args: compiled.required_args(),
            min_output_size: compiled.min_output_size(),
            tokens: compiled.tokens().iter().map(|t| token_view(compiled, t)).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn token_view(compiled: &CompiledFormat, token: &Token) -> TokenView {
    let kind = match token.verb() {
        Verb::None => "literal",
        Verb::Str => "str",
        Verb::Quoted => "quoted",
        Verb::Hex => "hex",
        Verb::Bad => "bad",
    };
    let literal = token.verb().is_literal();
    TokenView {
        kind,
        text: compiled.value(token).to_string(),
        flags: token.flags().iter_names().map(|(name, _)| name.to_string()).collect(),
        width: token.width(),
        precision: token.precision(),
        arg: (!literal).then_some(token.arg()),
    }
}

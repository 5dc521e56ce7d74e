//! Sum type declarations.
//!
//! ```text
//! sumtype Name [ '<' type T (',' type T)* '>' ] '=' Case ('|' Case)*
//! Case := Identifier [ '<' Arg (',' Arg)* '>' ]
//! ```

use super::{ParseSession, Production, TemplateScan};
use crate::types::{Declaration, SumType, SumTypeCase, TemplateParameter};

const KEYWORD: &str = "sumtype";

/// Attempt a sum type declaration at the cursor.
pub(super) fn parse(session: &ParseSession) -> Production {
    if !session.check_token(0, KEYWORD) {
        return Production::NoMatch;
    }

    let Some(name) = session.peek_token(1).filter(|t| t.is_identifier()) else {
        return session.malformed_at(1, "expected sum type name after 'sumtype'");
    };

    let mut offset = 2;
    let mut template_parameters = Vec::new();

    if session.check_token(offset, "<") {
        match session.parse_template_parameters(offset + 1, name) {
            TemplateScan::Closed { end } => {
                template_parameters = (offset + 1..end - 1)
                    .step_by(3)
                    .filter_map(|i| {
                        Some(TemplateParameter {
                            type_name: session.peek_token(i)?.text.clone(),
                            name: session.peek_token(i + 1)?.text.clone(),
                        })
                    })
                    .collect();
                offset = end;
            }
            TemplateScan::Broken { at } => {
                return session.malformed_at(at, "malformed template parameter list");
            }
        }
    }

    if !session.check_token(offset, "=") {
        return session.malformed_at(offset, "expected '=' after sum type name");
    }
    offset += 1;

    let mut cases = Vec::new();
    loop {
        let Some(case) = session.peek_token(offset).filter(|t| t.is_identifier()) else {
            return session.malformed_at(offset, "expected sum type alternative");
        };
        offset += 1;

        let mut template_arguments = Vec::new();
        if session.check_token(offset, "<") {
            match session.parse_template_arguments(offset + 1, case) {
                TemplateScan::Closed { end } => {
                    template_arguments = (offset + 1..end - 1)
                        .step_by(2)
                        .filter_map(|i| session.peek_token(i).map(|t| t.text.clone()))
                        .collect();
                    offset = end;
                }
                TemplateScan::Broken { at } => {
                    return session.malformed_at(at, "malformed template argument list");
                }
            }
        }

        cases.push(SumTypeCase {
            name: case.text.clone(),
            template_arguments,
        });

        if !session.check_token(offset, "|") {
            break;
        }
        offset += 1;
    }

    Production::Matched {
        declaration: Declaration::SumType(SumType {
            name: name.text.clone(),
            template_parameters,
            cases,
        }),
        consumed: offset,
    }
}

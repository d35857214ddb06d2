//! Test-case input translation.
//!
//! Inputs are stored as language-neutral strings like `[2,7,11,15], 9` —
//! a comma-separated argument list whose fragments are (usually) JSON
//! values.  Each fragment is re-rendered as a literal for the target
//! language.  Fragments that do not parse as JSON pass through verbatim for
//! the dynamic languages and are rejected for Go.

use serde_json::Value;

/// One argument fragment of a test input.
#[derive(Debug, Clone)]
pub enum Fragment {
    Json(Value),
    Raw(String),
}

/// Split an argument list on top-level commas, respecting brackets, braces,
/// parens, and quoted strings.
pub fn split_top_level(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in input.chars() {
        if let Some(q) = quote {
            current.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' | '{' | '(' => {
                depth += 1;
                current.push(ch);
            }
            ']' | '}' | ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

pub fn parse_fragment(fragment: &str) -> Fragment {
    match serde_json::from_str::<Value>(fragment) {
        Ok(value) => Fragment::Json(value),
        Err(_) => Fragment::Raw(fragment.to_string()),
    }
}

/// Parse a full input string into argument fragments.
pub fn parse_arguments(input: &str) -> Vec<Fragment> {
    split_top_level(input).iter().map(|s| parse_fragment(s)).collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Python
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn python_literal(fragment: &Fragment) -> String {
    match fragment {
        Fragment::Raw(raw) => raw.clone(),
        Fragment::Json(value) => render_python(value),
    }
}

fn render_python(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        // JSON string escapes are valid Python string escapes.
        Value::String(_) => value.to_string(),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(render_python).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", Value::String(k.clone()), render_python(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// JavaScript
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn javascript_literal(fragment: &Fragment) -> String {
    match fragment {
        Fragment::Raw(raw) => raw.clone(),
        // JSON is a subset of JavaScript.
        Fragment::Json(value) => value.to_string(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Go
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A rendered Go expression with its inferred type.
#[derive(Debug, Clone, PartialEq)]
pub struct GoExpr {
    pub expr: String,
    pub typ: String,
}

/// Render a fragment as a typed Go literal.  Types are inferred from the
/// JSON shape (`int`, `float64`, `string`, `bool`, slices thereof); mixed
/// or empty arrays fall back to `[]interface{}`.
pub fn go_literal(fragment: &Fragment) -> Result<GoExpr, String> {
    match fragment {
        Fragment::Raw(raw) => Err(format!("not a renderable Go literal: {raw}")),
        Fragment::Json(value) => render_go(value),
    }
}

fn render_go(value: &Value) -> Result<GoExpr, String> {
    match value {
        Value::Null => Ok(GoExpr {
            expr: "nil".to_string(),
            typ: "interface{}".to_string(),
        }),
        Value::Bool(b) => Ok(GoExpr {
            expr: b.to_string(),
            typ: "bool".to_string(),
        }),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Ok(GoExpr {
                    expr: n.to_string(),
                    typ: "int".to_string(),
                })
            } else {
                Ok(GoExpr {
                    expr: n.to_string(),
                    typ: "float64".to_string(),
                })
            }
        }
        // JSON string escapes are valid Go string escapes.
        Value::String(_) => Ok(GoExpr {
            expr: value.to_string(),
            typ: "string".to_string(),
        }),
        Value::Array(items) => {
            if items.is_empty() {
                return Ok(GoExpr {
                    expr: "[]interface{}{}".to_string(),
                    typ: "[]interface{}".to_string(),
                });
            }
            let rendered: Vec<GoExpr> = items.iter().map(render_go).collect::<Result<_, _>>()?;
            let first = rendered[0].typ.clone();
            let homogeneous = rendered.iter().all(|e| e.typ == first);
            let elem_type = if homogeneous { first } else { "interface{}".to_string() };
            let inner: Vec<String> = rendered.into_iter().map(|e| e.expr).collect();
            Ok(GoExpr {
                expr: format!("[]{elem_type}{{{}}}", inner.join(", ")),
                typ: format!("[]{elem_type}"),
            })
        }
        Value::Object(map) => {
            let mut inner = Vec::new();
            for (k, v) in map {
                let rendered = render_go(v)?;
                inner.push(format!("{}: {}", Value::String(k.clone()), rendered.expr));
            }
            Ok(GoExpr {
                expr: format!("map[string]interface{{}}{{{}}}", inner.join(", ")),
                typ: "map[string]interface{}".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_top_level_commas_only() {
        assert_eq!(
            split_top_level("[2,7,11,15], 9"),
            vec!["[2,7,11,15]".to_string(), "9".to_string()]
        );
        assert_eq!(
            split_top_level("\"a,b\", [1, [2, 3]], {\"k\": 1}"),
            vec!["\"a,b\"".to_string(), "[1, [2, 3]]".to_string(), "{\"k\": 1}".to_string()]
        );
        assert!(split_top_level("").is_empty());
    }

    #[test]
    fn python_rendering() {
        let args = parse_arguments("[2,7,11,15], 9, true, null");
        let rendered: Vec<String> = args.iter().map(python_literal).collect();
        assert_eq!(rendered, vec!["[2, 7, 11, 15]", "9", "True", "None"]);
    }

    #[test]
    fn javascript_rendering_is_json() {
        let args = parse_arguments("[1,2], \"x\"");
        let rendered: Vec<String> = args.iter().map(javascript_literal).collect();
        assert_eq!(rendered, vec!["[1,2]", "\"x\""]);
    }

    #[test]
    fn go_rendering_infers_types() {
        let args = parse_arguments("[2,7,11,15], 9");
        let nums = go_literal(&args[0]).unwrap();
        assert_eq!(nums.expr, "[]int{2, 7, 11, 15}");
        assert_eq!(nums.typ, "[]int");
        let target = go_literal(&args[1]).unwrap();
        assert_eq!(target.expr, "9");
        assert_eq!(target.typ, "int");
    }

    #[test]
    fn go_nested_and_string_slices() {
        let args = parse_arguments("[[1,2],[3,4]], [\"a\",\"b\"]");
        assert_eq!(go_literal(&args[0]).unwrap().expr, "[][]int{[]int{1, 2}, []int{3, 4}}");
        assert_eq!(go_literal(&args[1]).unwrap().expr, "[]string{\"a\", \"b\"}");
    }

    #[test]
    fn go_rejects_non_json_fragments() {
        let fragment = parse_fragment("lambda x: x");
        assert!(go_literal(&fragment).is_err());
    }
}

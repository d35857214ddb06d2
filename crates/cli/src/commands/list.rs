use serde_json::json;

use scales_domain::config::is_vim_mode;
use scales_domain::error::{Error, Result};

use crate::output;
use crate::state::AppContext;

pub fn run(ctx: &AppContext, by: &str) -> Result<()> {
    let groups: Vec<(String, Vec<String>)> = match by {
        "pattern" => ctx
            .problems
            .list_by_pattern()
            .into_iter()
            .map(|(k, v)| (k, ids(&v)))
            .collect(),
        "difficulty" => ctx
            .problems
            .list_by_difficulty()
            .into_iter()
            .map(|(k, v)| (k.tag().to_string(), ids(&v)))
            .collect(),
        "company" => ctx
            .problems
            .list_by_company()
            .into_iter()
            .map(|(k, v)| (k, ids(&v)))
            .collect(),
        other => {
            return Err(Error::Other(format!(
                "unknown grouping '{other}' (expected pattern, difficulty, or company)"
            )))
        }
    };

    if is_vim_mode() {
        let payload: serde_json::Map<String, serde_json::Value> = groups
            .into_iter()
            .map(|(k, v)| (k, json!(v)))
            .collect();
        output::print_json(&serde_json::Value::Object(payload));
    } else {
        for (group, problem_ids) in groups {
            println!("{group} ({})", problem_ids.len());
            for id in problem_ids {
                println!("  {id}");
            }
        }
    }
    Ok(())
}

fn ids(problems: &[std::sync::Arc<scales_problems::Problem>]) -> Vec<String> {
    problems.iter().map(|p| p.id.clone()).collect()
}

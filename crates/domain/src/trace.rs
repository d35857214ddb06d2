use serde::Serialize;

/// Structured trace events emitted across all AlgoScales crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    ProblemsLoaded {
        total: usize,
        files_seen: usize,
        skipped: usize,
    },
    ProblemSkipped {
        path: String,
        reason: String,
    },
    WorkspaceProvisioned {
        dir: String,
        language: String,
        reused_code: bool,
    },
    SessionStarted {
        session_id: String,
        problem_id: String,
        mode: String,
        language: String,
    },
    SessionFinished {
        session_id: String,
        problem_id: String,
        solved: bool,
        duration_ms: u64,
    },
    TestRunFinished {
        problem_id: String,
        language: String,
        total: usize,
        passed: usize,
        all_passed: bool,
        duration_ms: u64,
    },
    RecordAppended {
        problem_id: String,
        solved: bool,
    },
    PlanCreated {
        date: String,
        patterns: usize,
    },
    PlanStateChanged {
        date: String,
        pattern: String,
        from: String,
        to: String,
    },
    StreakUpdated {
        current: u32,
        longest: u32,
    },
    HintServed {
        problem_id: String,
        level: u8,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "scales_event");
    }
}

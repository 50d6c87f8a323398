//! Plan model: the compiled sequence/choice/task tree handed to a runner.

use serde::{Deserialize, Serialize};

/// Compiled plan node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanNode {
    /// Literal command to execute
    Task { command: String },
    /// Steps run in order; a failing step aborts the rest
    Sequence { title: String, steps: Vec<PlanNode> },
    /// Exactly one alternative is selected at run time
    Choice {
        title: String,
        alternatives: Vec<Alternative>,
    },
}

/// One labeled branch of a [`PlanNode::Choice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub index: u32,
    pub label: String,
    pub body: PlanNode,
}

impl Alternative {
    pub fn new(index: u32, label: impl Into<String>, body: PlanNode) -> Self {
        Self {
            index,
            label: label.into(),
            body,
        }
    }
}

impl PlanNode {
    pub fn task(command: impl Into<String>) -> Self {
        PlanNode::Task {
            command: command.into(),
        }
    }

    pub fn sequence(title: impl Into<String>, steps: Vec<PlanNode>) -> Self {
        PlanNode::Sequence {
            title: title.into(),
            steps,
        }
    }

    pub fn choice(title: impl Into<String>, alternatives: Vec<Alternative>) -> Self {
        PlanNode::Choice {
            title: title.into(),
            alternatives,
        }
    }

    /// Every task command reachable from this node, in document order.
    ///
    /// Commands of all alternatives are included.
    pub fn commands(&self) -> Vec<&str> {
        let mut commands = Vec::new();
        self.collect_commands(&mut commands);
        commands
    }

    fn collect_commands<'a>(&'a self, commands: &mut Vec<&'a str>) {
        match self {
            PlanNode::Task { command } => commands.push(command),
            PlanNode::Sequence { steps, .. } => {
                for step in steps {
                    step.collect_commands(commands);
                }
            }
            PlanNode::Choice { alternatives, .. } => {
                for alternative in alternatives {
                    alternative.body.collect_commands(commands);
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            PlanNode::Task { .. } => 1,
            PlanNode::Sequence { steps, .. } => {
                1 + steps.iter().map(PlanNode::depth).max().unwrap_or(0)
            }
            PlanNode::Choice { alternatives, .. } => {
                1 + alternatives
                    .iter()
                    .map(|a| a.body.depth())
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    pub fn stats(&self) -> PlanStats {
        let mut stats = PlanStats {
            depth: self.depth(),
            ..PlanStats::default()
        };
        self.count(&mut stats);
        stats
    }

    fn count(&self, stats: &mut PlanStats) {
        match self {
            PlanNode::Task { .. } => stats.tasks += 1,
            PlanNode::Sequence { steps, .. } => {
                stats.sequences += 1;
                steps.iter().for_each(|s| s.count(stats));
            }
            PlanNode::Choice { alternatives, .. } => {
                stats.choices += 1;
                stats.alternatives += alternatives.len();
                alternatives.iter().for_each(|a| a.body.count(stats));
            }
        }
    }
}

/// Node counts of a compiled plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub tasks: usize,
    pub sequences: usize,
    pub choices: usize,
    pub alternatives: usize,
    pub depth: usize,
}

/// Result of compiling one [`Input`](crate::domain::Input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Source identifier carried over from the input
    pub input: String,
    pub root: PlanNode,
}

impl Plan {
    pub fn stats(&self) -> PlanStats {
        self.root.stats()
    }

    pub fn commands(&self) -> Vec<&str> {
        self.root.commands()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlanNode {
        PlanNode::sequence(
            "root",
            vec![
                PlanNode::task("echo a"),
                PlanNode::choice(
                    "pick",
                    vec![
                        Alternative::new(1, "one", PlanNode::sequence("Option 1: one", vec![PlanNode::task("echo b")])),
                        Alternative::new(2, "two", PlanNode::sequence("Option 2: two", vec![PlanNode::task("echo c")])),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn given_plan_when_stats_then_counts_each_kind() {
        let stats = sample().stats();
        assert_eq!(
            stats,
            PlanStats {
                tasks: 3,
                sequences: 3,
                choices: 1,
                alternatives: 2,
                depth: 4,
            }
        );
    }

    #[test]
    fn given_plan_when_commands_then_document_order() {
        assert_eq!(sample().commands(), vec!["echo a", "echo b", "echo c"]);
    }

    #[test]
    fn given_task_when_serialized_then_tagged_by_kind() {
        let json = serde_json::to_value(PlanNode::task("echo a")).unwrap();
        assert_eq!(json["kind"], "task");
        assert_eq!(json["command"], "echo a");
    }
}

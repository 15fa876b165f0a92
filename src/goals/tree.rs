use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Goal, NewGoal, MAX_PROGRESS};

/// The root sequence of goals. Every node owns its children; there are no
/// back references, so a plain recursive `Vec<Goal>` is the whole structure.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalTree {
    goals: Vec<Goal>,
}

impl GoalTree {
    pub fn new(goals: Vec<Goal>) -> Self {
        GoalTree { goals }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Appends a new root-level goal with a fresh id and no sub-goals.
    pub fn add_goal(&mut self, fields: NewGoal) -> &Goal {
        let goal = Goal::new(fields);
        info!(id = %goal.id, title = %goal.title, "goal added");
        let index = self.goals.len();
        self.goals.push(goal);
        &self.goals[index]
    }

    /// Appends a child to the goal `parent_id`. Unknown parents are ignored.
    pub fn add_sub_goal(&mut self, parent_id: &str, fields: NewGoal) -> Option<&Goal> {
        let Some(parent) = find_mut(&mut self.goals, parent_id) else {
            warn!(parent_id, "no goal to attach the sub-goal to");
            return None;
        };
        let goal = Goal::new(fields);
        info!(id = %goal.id, parent_id, "sub-goal added");
        parent.sub_goals.push(goal);
        parent.sub_goals.last()
    }

    /// Sets the progress of the first depth-first match of `goal_id`.
    ///
    /// Nothing else changes: parents keep their own progress and status is
    /// left alone even at 100. Returns `false` when no goal matched, which is
    /// not an error.
    pub fn update_progress(&mut self, goal_id: &str, progress: u8) -> bool {
        match find_mut(&mut self.goals, goal_id) {
            Some(goal) => {
                goal.progress = progress.min(MAX_PROGRESS);
                info!(goal_id, progress = goal.progress, "goal progress updated");
                true
            },
            None => {
                warn!(goal_id, "progress update for unknown goal ignored");
                false
            },
        }
    }

    pub fn find(&self, goal_id: &str) -> Option<&Goal> {
        let found = find(&self.goals, goal_id);
        debug!(goal_id, found = found.is_some(), "goal lookup");
        found
    }

    /// Every node in pre-order along with its depth (roots are 0).
    pub fn flatten(&self) -> Vec<(usize, &Goal)> {
        let mut out = Vec::new();
        walk(&self.goals, 0, &mut out);
        out
    }
}

fn find<'a>(goals: &'a [Goal], goal_id: &str) -> Option<&'a Goal> {
    for goal in goals {
        if goal.id == goal_id {
            return Some(goal);
        }
        if let Some(found) = find(&goal.sub_goals, goal_id) {
            return Some(found);
        }
    }
    None
}

fn find_mut<'a>(goals: &'a mut [Goal], goal_id: &str) -> Option<&'a mut Goal> {
    for goal in goals.iter_mut() {
        if goal.id == goal_id {
            return Some(goal);
        }
        if let Some(found) = find_mut(&mut goal.sub_goals, goal_id) {
            return Some(found);
        }
    }
    None
}

fn walk<'a>(goals: &'a [Goal], depth: usize, out: &mut Vec<(usize, &'a Goal)>) {
    for goal in goals {
        out.push((depth, goal));
        walk(&goal.sub_goals, depth + 1, out);
    }
}

use super::{GoalStatus, NewGoal, Timeframe};

fn suggestion(title: &str, description: &str, timeframe: Timeframe) -> NewGoal {
    NewGoal {
        title: title.to_string(),
        description: description.to_string(),
        timeframe,
        status: GoalStatus::NotStarted,
        progress: 0,
    }
}

/// Canned sub-goal ideas keyed on words in the parent's title.
pub fn suggest_sub_goals(goal_title: &str) -> Vec<NewGoal> {
    let title = goal_title.to_lowercase();
    if title.contains("spanish") {
        vec![
            suggestion(
                "Learn 500 Common Spanish Words",
                "Focus on most frequently used vocabulary",
                Timeframe::Monthly,
            ),
            suggestion(
                "Practice with a Native Speaker",
                "Find a language exchange partner",
                Timeframe::Weekly,
            ),
        ]
    } else if title.contains("marathon") {
        vec![
            suggestion(
                "Establish Regular Running Schedule",
                "Run 3-4 times per week",
                Timeframe::Weekly,
            ),
            suggestion(
                "Complete a Half Marathon",
                "Train for and run 21km",
                Timeframe::Monthly,
            ),
        ]
    } else {
        vec![
            suggestion(
                "Break down your goal",
                "Divide into smaller achievable steps",
                Timeframe::Weekly,
            ),
            suggestion(
                "Set a timeline",
                "Create deadlines for each milestone",
                Timeframe::Weekly,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions_match_title_keywords() {
        let spanish = suggest_sub_goals("Learn SPANISH");
        assert_eq!(spanish[0].title, "Learn 500 Common Spanish Words");

        let marathon = suggest_sub_goals("Run a Marathon");
        assert_eq!(marathon[1].title, "Complete a Half Marathon");

        let generic = suggest_sub_goals("Write a novel");
        assert_eq!(generic.len(), 2);
        assert!(generic
            .iter()
            .all(|g| g.progress == 0 && g.status == GoalStatus::NotStarted));
    }
}

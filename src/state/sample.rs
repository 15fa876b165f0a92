use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    goals::{Goal, GoalStatus, Timeframe},
    learning::{LearningItem, LearningType},
    profile::{Preferences, Theme, User, VisibleSections},
};

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .unwrap_or_default()
}

pub fn sample_user() -> User {
    User {
        id: "1".to_string(),
        name: "Alex Durand".to_string(),
        email: "alex@example.com".to_string(),
        avatar: "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?auto=compress&cs=tinysrgb&w=300".to_string(),
        preferences: Preferences {
            theme: Theme::Dark,
            public_profile: false,
            visible_sections: VisibleSections::default(),
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn item(
    id: &str,
    kind: LearningType,
    title: &str,
    description: &str,
    added: DateTime<Utc>,
    summary: &str,
    tags: &[&str],
    completed: bool,
) -> LearningItem {
    LearningItem {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        description: description.to_string(),
        date_added: added,
        summary: summary.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        completed,
        ai_generated: true,
    }
}

pub fn sample_learning_items() -> Vec<LearningItem> {
    vec![
        item(
            "1",
            LearningType::Book,
            "Atomic Habits",
            "A guide to building good habits and breaking bad ones",
            date(2023, 6, 15),
            "This book emphasizes the importance of small, incremental changes to achieve remarkable results. It provides practical strategies for forming good habits, breaking bad ones, and mastering the tiny behaviors that lead to remarkable results.",
            &["self-improvement", "psychology", "habits"],
            true,
        ),
        item(
            "2",
            LearningType::Video,
            "How to Learn Anything Fast",
            "YouTube video on accelerated learning techniques",
            date(2023, 9, 22),
            "This video explores the concept of the Feynman Technique, spaced repetition, and active recall as powerful tools for learning any subject quickly and effectively.",
            &["learning", "education", "productivity"],
            false,
        ),
        item(
            "3",
            LearningType::Course,
            "Machine Learning Fundamentals",
            "Online course covering the basics of machine learning",
            date(2023, 11, 5),
            "This course introduces key concepts in machine learning, including supervised and unsupervised learning, neural networks, and practical applications using Python and TensorFlow.",
            &["technology", "AI", "programming"],
            false,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn goal(
    id: &str,
    title: &str,
    description: &str,
    timeframe: Timeframe,
    progress: u8,
    status: GoalStatus,
    created: DateTime<Utc>,
    sub_goals: Vec<Goal>,
) -> Goal {
    Goal {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        timeframe,
        progress,
        status,
        sub_goals,
        date_created: created,
        date_completed: None,
    }
}

pub fn sample_goals() -> Vec<Goal> {
    let mut first_run = goal(
        "2-1",
        "Run 5km without stopping",
        "Build basic endurance",
        Timeframe::Monthly,
        100,
        GoalStatus::Completed,
        date(2023, 3, 1),
        vec![],
    );
    first_run.date_completed = Some(date(2023, 4, 15));

    vec![
        goal(
            "1",
            "Learn Spanish",
            "Become conversationally fluent in Spanish",
            Timeframe::Yearly,
            35,
            GoalStatus::InProgress,
            date(2023, 1, 1),
            vec![
                goal(
                    "1-1",
                    "Complete Duolingo Spanish Tree",
                    "Finish all lessons in the Spanish course",
                    Timeframe::Monthly,
                    60,
                    GoalStatus::InProgress,
                    date(2023, 1, 15),
                    vec![],
                ),
                goal(
                    "1-2",
                    "Read a Spanish Book",
                    "Read \"El Principito\" in Spanish",
                    Timeframe::Monthly,
                    20,
                    GoalStatus::InProgress,
                    date(2023, 2, 10),
                    vec![],
                ),
            ],
        ),
        goal(
            "2",
            "Run a Marathon",
            "Train and complete a full marathon",
            Timeframe::Yearly,
            50,
            GoalStatus::InProgress,
            date(2023, 1, 1),
            vec![
                first_run,
                goal(
                    "2-2",
                    "Run 10km race",
                    "Participate in local 10km event",
                    Timeframe::Monthly,
                    80,
                    GoalStatus::InProgress,
                    date(2023, 4, 20),
                    vec![],
                ),
            ],
        ),
    ]
}

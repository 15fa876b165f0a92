use super::QuestionnaireError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingStep {
    pub title: &'static str,
    pub description: &'static str,
}

pub const STEPS: [OnboardingStep; 5] = [
    OnboardingStep {
        title: "Your personal digital brain",
        description: "BRAIN is your own space to organise what you know, follow your goals and look back at your progress.",
    },
    OnboardingStep {
        title: "Smart learning",
        description: "Record what you read, watch and study. Summaries are generated for every item you add.",
    },
    OnboardingStep {
        title: "Goals and progress",
        description: "Set goals and track them. BRAIN helps you break big goals down into achievable steps.",
    },
    OnboardingStep {
        title: "Personal insights",
        description: "Discover how you learn, where you shine and what to work on, from your own data.",
    },
    OnboardingStep {
        title: "Privacy first",
        description: "You stay in control of your data. Choose what to share and what stays private.",
    },
];

/// The linear intro shown after sign up. Leaving the last step starts the
/// personality questionnaire.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingTour {
    current: usize,
}

impl OnboardingTour {
    pub fn new() -> Self {
        OnboardingTour::default()
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn step(&self) -> &'static OnboardingStep {
        &STEPS[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current == STEPS.len() - 1
    }

    /// Returns `false` once the tour is over.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn select(&mut self, index: usize) -> Result<(), QuestionnaireError> {
        if index >= STEPS.len() {
            return Err(QuestionnaireError::OutOfRange(index));
        }
        self.current = index;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tour_walks_every_step_once() {
        let mut tour = OnboardingTour::new();
        let mut seen = vec![tour.step().title];
        while tour.next() {
            seen.push(tour.step().title);
        }
        assert_eq!(seen.len(), 5);
        assert!(tour.is_last());
        assert_eq!(tour.step().title, "Privacy first");
    }

    #[test]
    fn test_select_any_step() {
        let mut tour = OnboardingTour::new();
        tour.select(3).unwrap();
        assert_eq!(tour.index(), 3);
        assert_eq!(tour.select(5), Err(QuestionnaireError::OutOfRange(5)));
        assert_eq!(tour.index(), 3);
    }
}

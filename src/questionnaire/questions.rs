#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: u8,
    pub question: &'static str,
    pub placeholder: &'static str,
}

pub const QUESTIONS: [Question; 5] = [
    Question {
        id: 1,
        question: "Describe a recent challenge you overcame and how you went about it.",
        placeholder: "For example: a difficult project, a hard thing to learn...",
    },
    Question {
        id: 2,
        question: "What do you value most in other people, and why?",
        placeholder: "The qualities you particularly appreciate...",
    },
    Question {
        id: 3,
        question: "How do you prefer to learn new things?",
        placeholder: "Your favourite ways of learning...",
    },
    Question {
        id: 4,
        question: "What is your ideal work environment?",
        placeholder: "The mood and context that make you the most productive...",
    },
    Question {
        id: 5,
        question: "What are your personal goals for the coming years?",
        placeholder: "Your aspirations, what you want to achieve...",
    },
];

pub const LAST_QUESTION: usize = QUESTIONS.len() - 1;

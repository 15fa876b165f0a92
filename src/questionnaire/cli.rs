use clap::{Args, Subcommand};
use dialoguer::{Confirm, Input, Select};
use tracing::{info, warn};

use super::{
    onboarding::{OnboardingTour, STEPS},
    questions::{Question, QUESTIONS},
    QuestionnaireError, QuestionnaireFlow, Step,
};
use crate::{
    auth::SessionEvents,
    config::Config,
    error::{report, Result},
    remote::{PersonalityAnalyzer, PersonalityResult, ResultStore},
};

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct PersonalityArgs {
    #[command(subcommand)]
    pub command: PersonalityCommands,
}

#[derive(Debug, Subcommand)]
pub enum PersonalityCommands {
    /// Walk through the intro, then take the test
    Onboarding(OnboardingArgs),
    /// Answer the five questions and get your analysis
    Test(TestArgs),
}

impl PersonalityCommands {
    pub async fn handle_commands(self, config: &Config, events: &SessionEvents) -> i16 {
        let result = match self {
            PersonalityCommands::Onboarding(args) => args.run(config, events).await,
            PersonalityCommands::Test(args) => args.run(config, events).await,
        };
        match result {
            Ok(()) => 0,
            Err(err) => report(&err),
        }
    }
}

#[derive(Debug, Args, Clone, Default)]
pub struct TestArgs {
    /// Answers in question order, instead of being asked for them
    #[arg(long = "answer")]
    answers: Vec<String>,
}

impl TestArgs {
    async fn run(&self, config: &Config, events: &SessionEvents) -> Result<()> {
        let session = events.require()?;
        let client = config.client(events.clone())?;
        let analysis = if self.answers.is_empty() {
            take_test(&mut Prompter, &client, &client, &session.user.id).await?
        } else {
            let mut scripted = Scripted(self.answers.clone());
            take_test(&mut scripted, &client, &client, &session.user.id).await?
        };
        print_analysis(&analysis);
        Ok(())
    }
}

#[derive(Debug, Args, Clone, Default)]
pub struct OnboardingArgs {
    /// Do not wait between the intro steps
    #[arg(short, long, default_value_t = false)]
    yes: bool,
    #[command(flatten)]
    test: TestArgs,
}

impl OnboardingArgs {
    async fn run(&self, config: &Config, events: &SessionEvents) -> Result<()> {
        // Fail before the intro rather than after it.
        events.require()?;
        let mut tour = OnboardingTour::new();
        loop {
            let step = tour.step();
            println!("[{}/{}] {}", tour.index() + 1, STEPS.len(), step.title);
            println!("  {}", step.description);
            let choice = if self.yes {
                TourMove::Next
            } else {
                ask_tour_move(&tour)?
            };
            match walk(&mut tour, choice)? {
                TourEnd::Continue => {},
                TourEnd::Left => {
                    info!(step = tour.index(), "onboarding left early");
                    return Ok(());
                },
                TourEnd::Finished => break,
            }
        }
        self.test.run(config, events).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TourMove {
    Next,
    Back,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TourEnd {
    Continue,
    Left,
    Finished,
}

fn ask_tour_move(tour: &OnboardingTour) -> Result<TourMove> {
    let next = if tour.is_last() {
        "Start the personality test"
    } else {
        "Continue"
    };
    let moves = [next, "Back", "Leave"];
    Ok(match Select::new().items(&moves[..]).default(0).interact()? {
        0 => TourMove::Next,
        1 => TourMove::Back,
        _ => TourMove::Leave,
    })
}

/// Applies one move to the tour. Going back from the first step stays there.
fn walk(tour: &mut OnboardingTour, choice: TourMove) -> Result<TourEnd> {
    Ok(match choice {
        TourMove::Next => {
            if tour.next() {
                TourEnd::Continue
            } else {
                TourEnd::Finished
            }
        },
        TourMove::Back => {
            tour.select(tour.index().saturating_sub(1))?;
            TourEnd::Continue
        },
        TourMove::Leave => TourEnd::Left,
    })
}

/// Typed instead of an answer to return to the previous question.
const BACK: &str = ":back";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Reply {
    Answer(String),
    Back,
}

/// Where the answers come from.
trait AnswerSource {
    fn answer(&mut self, index: usize, question: &Question, previous: Option<&str>)
        -> Result<Reply>;

    /// Whether to try again after a failure. Blocking questions are asked
    /// again only when this is true.
    fn retry(&mut self, message: &str) -> Result<bool>;
}

struct Prompter;

impl AnswerSource for Prompter {
    fn answer(
        &mut self,
        index: usize,
        question: &Question,
        previous: Option<&str>,
    ) -> Result<Reply> {
        println!("  ({})", question.placeholder);
        if index > 0 {
            println!("  type {BACK} to change the previous answer");
        }
        let text = Input::<String>::new()
            .with_prompt(question.question)
            .with_initial_text(previous.unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        if index > 0 && text.trim() == BACK {
            return Ok(Reply::Back);
        }
        Ok(Reply::Answer(text))
    }

    fn retry(&mut self, message: &str) -> Result<bool> {
        eprintln!("{message}");
        Ok(Confirm::new().with_prompt("Try again?").default(true).interact()?)
    }
}

struct Scripted(Vec<String>);

impl AnswerSource for Scripted {
    fn answer(&mut self, index: usize, _: &Question, _: Option<&str>) -> Result<Reply> {
        Ok(Reply::Answer(self.0.get(index).cloned().unwrap_or_default()))
    }

    fn retry(&mut self, _message: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Runs the whole wizard, then stores the result of a successful analysis.
async fn take_test(
    source: &mut dyn AnswerSource,
    analyzer: &dyn PersonalityAnalyzer,
    store: &dyn ResultStore,
    user_id: &str,
) -> Result<String> {
    let mut flow = QuestionnaireFlow::new();
    loop {
        let index = flow.current_index();
        println!(
            "Question {}/{}  {}%",
            index + 1,
            QUESTIONS.len(),
            flow.progress()
        );
        let text = match source.answer(index, flow.current_question(), flow.answer_at(index))? {
            Reply::Answer(text) => text,
            Reply::Back => {
                flow.select(index.saturating_sub(1))?;
                continue;
            },
        };
        flow.answer(&text)?;
        match flow.advance() {
            Ok(Step::Question(_)) => continue,
            Ok(Step::ReadyToSubmit) => {},
            Err(QuestionnaireError::EmptyAnswer) => {
                if source.retry(&QuestionnaireError::EmptyAnswer.to_string())? {
                    continue;
                }
                return Err(QuestionnaireError::EmptyAnswer.into());
            },
            Err(err) => return Err(err.into()),
        }

        println!("Analysing...");
        match flow.submit(analyzer).await {
            Ok(analysis) => {
                let result = PersonalityResult {
                    user_id: user_id.to_string(),
                    responses: flow.answers().clone(),
                    gpt_analysis: analysis.clone(),
                };
                if let Err(err) = store.save_result(&result).await {
                    // Printed even when it could not be stored.
                    print_analysis(&analysis);
                    return Err(err.into());
                }
                return Ok(analysis);
            },
            Err(QuestionnaireError::AnalysisFailed(message)) => {
                warn!(%message, "analysis failed");
                if !source.retry(&message)? {
                    return Err(QuestionnaireError::AnalysisFailed(message).into());
                }
            },
            Err(err) => return Err(err.into()),
        }
    }
}

pub fn print_analysis(analysis: &str) {
    println!();
    println!("Your psychological profile");
    println!();
    for paragraph in analysis.split('\n') {
        println!("{paragraph}");
    }
}

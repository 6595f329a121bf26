//! Bundled quiz content installed into every catalog.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::thread_rng;

use quiz_core::model::{Question, QuestionError, QuestionId, QuizDefinition, QuizId};

use crate::error::CatalogError;

const RANDOM_MIX_SIZE: usize = 10;

/// The quizzes every fresh catalog starts with: four topical sets plus a
/// shuffled mix drawn from all of them.
///
/// # Errors
///
/// Returns `CatalogError` if any bundled entry fails validation.
pub fn bundled_quizzes(now: DateTime<Utc>) -> Result<Vec<QuizDefinition>, CatalogError> {
    let science = science_questions()?;
    let math = math_questions()?;
    let general = general_knowledge_questions()?;
    let tech = tech_questions()?;

    let mut pool: Vec<Question> = science
        .iter()
        .chain(&math)
        .chain(&general)
        .chain(&tech)
        .cloned()
        .collect();
    let mut rng = thread_rng();
    pool.as_mut_slice().shuffle(&mut rng);
    pool.truncate(RANDOM_MIX_SIZE);

    Ok(vec![
        QuizDefinition::new(QuizId::new("quiz_sci"), "Science Challenge", science, 600, now)?
            .with_category("Science")
            .with_icon("🔬"),
        QuizDefinition::new(QuizId::new("quiz_math"), "Math Master", math, 480, now)?
            .with_category("Mathematics")
            .with_icon("🔢"),
        QuizDefinition::new(QuizId::new("quiz_gk"), "General Knowledge", general, 600, now)?
            .with_category("General")
            .with_icon("🌍"),
        QuizDefinition::new(QuizId::new("quiz_tech"), "Tech & CS", tech, 600, now)?
            .with_category("Technology")
            .with_icon("💻"),
        QuizDefinition::new(QuizId::new("quiz_random"), "Random Mix", pool, 900, now)?
            .with_category("Mixed")
            .with_icon("🎲"),
    ])
}

fn question(
    id: &str,
    text: &str,
    options: [&str; 4],
    correct_index: usize,
    category: &str,
) -> Result<Question, QuestionError> {
    Question::new(
        QuestionId::new(id),
        text,
        options.iter().map(|o| (*o).to_owned()).collect(),
        correct_index,
        category,
    )
}

fn science_questions() -> Result<Vec<Question>, QuestionError> {
    Ok(vec![
        question(
            "s1",
            "What is the chemical symbol for gold?",
            ["Au", "Ag", "Fe", "Cu"],
            0,
            "Science",
        )?,
        question(
            "s2",
            "What planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Saturn"],
            1,
            "Science",
        )?,
        question(
            "s3",
            "What is the powerhouse of the cell?",
            ["Nucleus", "Ribosome", "Mitochondria", "Golgi body"],
            2,
            "Science",
        )?,
        question(
            "s4",
            "Which gas do plants absorb from the atmosphere?",
            ["Oxygen", "Nitrogen", "Carbon Dioxide", "Hydrogen"],
            2,
            "Science",
        )?,
        question(
            "s5",
            "How many bones are in the adult human body?",
            ["196", "206", "216", "226"],
            1,
            "Science",
        )?,
        question(
            "s6",
            "What is the chemical formula for water?",
            ["HO2", "H2O", "H2O2", "OH"],
            1,
            "Science",
        )?,
    ])
}

fn math_questions() -> Result<Vec<Question>, QuestionError> {
    Ok(vec![
        question(
            "m1",
            "What is the value of π (pi) to two decimal places?",
            ["3.12", "3.14", "3.16", "3.18"],
            1,
            "Math",
        )?,
        question(
            "m2",
            "What is the square root of 144?",
            ["10", "11", "12", "13"],
            2,
            "Math",
        )?,
        question(
            "m3",
            "What is the next prime number after 7?",
            ["9", "10", "11", "13"],
            2,
            "Math",
        )?,
        question("m4", "What is 2^10?", ["512", "1024", "2048", "4096"], 1, "Math")?,
        question(
            "m5",
            "What is the factorial of 5 (5!)?",
            ["60", "100", "120", "150"],
            2,
            "Math",
        )?,
        question(
            "m6",
            "How many sides does a hexagon have?",
            ["5", "6", "7", "8"],
            1,
            "Math",
        )?,
    ])
}

fn general_knowledge_questions() -> Result<Vec<Question>, QuestionError> {
    Ok(vec![
        question(
            "g1",
            "What is the largest ocean on Earth?",
            ["Atlantic", "Indian", "Pacific", "Arctic"],
            2,
            "GK",
        )?,
        question(
            "g2",
            "What is the capital of Australia?",
            ["Sydney", "Melbourne", "Canberra", "Perth"],
            2,
            "GK",
        )?,
        question(
            "g3",
            "Who painted the Mona Lisa?",
            ["Van Gogh", "Da Vinci", "Picasso", "Michelangelo"],
            1,
            "GK",
        )?,
        question(
            "g4",
            "What is the smallest country in the world?",
            ["Monaco", "Vatican City", "San Marino", "Liechtenstein"],
            1,
            "GK",
        )?,
        question(
            "g5",
            "What year did World War II end?",
            ["1943", "1944", "1945", "1946"],
            2,
            "GK",
        )?,
        question(
            "g6",
            "What is the currency of Japan?",
            ["Yuan", "Won", "Yen", "Ringgit"],
            2,
            "GK",
        )?,
    ])
}

fn tech_questions() -> Result<Vec<Question>, QuestionError> {
    Ok(vec![
        question(
            "t1",
            "What does CPU stand for?",
            [
                "Central Processing Unit",
                "Central Program Utility",
                "Computer Personal Unit",
                "Central Peripheral Unit",
            ],
            0,
            "Tech",
        )?,
        question(
            "t2",
            "Which data structure uses FIFO?",
            ["Stack", "Queue", "Tree", "Graph"],
            1,
            "Tech",
        )?,
        question(
            "t3",
            "What is the time complexity of binary search?",
            ["O(n)", "O(n²)", "O(log n)", "O(1)"],
            2,
            "Tech",
        )?,
        question(
            "t4",
            "What does SQL stand for?",
            [
                "Structured Query Language",
                "Simple Query Language",
                "Standard Query Logic",
                "System Query Language",
            ],
            0,
            "Tech",
        )?,
        question(
            "t5",
            "Which protocol is used for secure web browsing?",
            ["HTTP", "FTP", "HTTPS", "SMTP"],
            2,
            "Tech",
        )?,
        question(
            "t6",
            "What is the binary representation of 10?",
            ["1000", "1010", "1100", "1001"],
            1,
            "Tech",
        )?,
    ])
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn bundled_quizzes_are_valid_and_stamped() {
        let quizzes = bundled_quizzes(fixed_now()).unwrap();
        assert_eq!(quizzes.len(), 5);
        for quiz in &quizzes {
            assert!(quiz.question_count() >= 2);
            assert!(!quiz.is_custom());
            assert_eq!(quiz.created_at(), fixed_now());
        }
    }

    #[test]
    fn random_mix_draws_from_the_topical_sets() {
        let quizzes = bundled_quizzes(fixed_now()).unwrap();
        let mix = quizzes
            .iter()
            .find(|q| q.id().as_str() == "quiz_random")
            .unwrap();
        assert_eq!(mix.question_count(), RANDOM_MIX_SIZE);

        let topical_ids: Vec<&str> = quizzes
            .iter()
            .filter(|q| q.id().as_str() != "quiz_random")
            .flat_map(|q| q.questions().iter().map(|question| question.id().as_str()))
            .collect();
        for question in mix.questions() {
            assert!(topical_ids.contains(&question.id().as_str()));
        }
    }
}

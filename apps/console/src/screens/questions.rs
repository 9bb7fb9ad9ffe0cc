use anyhow::{Context as _, Result};

use survey_cell::{answer_label, SurveyService};

use crate::cli::QuestionAction;
use super::Context;

pub async fn run(ctx: &mut Context, action: QuestionAction) -> Result<()> {
    let session = ctx.require_admin("managing survey questions")?;
    let service = SurveyService::new(&ctx.config);

    match action {
        QuestionAction::List => {
            for (i, question) in service.get_questions().await?.iter().enumerate() {
                println!("{}. {}", i + 1, question.question_title);
                for (j, answer) in question.answers.iter().enumerate() {
                    println!("   {}. {} ({})", answer_label(j).unwrap_or('?'), answer.answer, answer.point);
                }
            }
        }
        QuestionAction::Import { file } => {
            let content = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "questions.json".to_string());

            service.import_questions(&file_name, content, session.bearer()).await?;
            println!("Imported questions from {}", file_name);
        }
    }
    Ok(())
}

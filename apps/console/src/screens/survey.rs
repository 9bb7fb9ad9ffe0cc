use anyhow::Result;

use survey_cell::{answer_label, submission_notice, Submitter, SurveyEngine, SurveyService};

use super::Context;

fn label_index(answer: &str) -> Option<usize> {
    let letter = answer.chars().next()?.to_ascii_uppercase();
    letter.is_ascii_uppercase().then(|| (letter as u8 - b'A') as usize)
}

pub async fn take(ctx: &mut Context) -> Result<()> {
    println!("Bài Test đánh giá trầm cảm Beck");
    ctx.prompt.ask("Press Enter to start").await?;

    let service = SurveyService::new(&ctx.config);
    let mut engine = SurveyEngine::new();
    if let Err(e) = service.start(&mut engine).await {
        println!("Error: {}", e);
        return Ok(());
    }

    while let Some(question) = engine.current_question().cloned() {
        println!();
        println!(
            "{}/{}. {}",
            engine.current_question_index() + 1,
            engine.question_count(),
            question.question_title
        );
        for (i, answer) in question.answers.iter().enumerate() {
            let marker = if engine.selected_answer_index() == Some(i) { "*" } else { " " };
            println!(" {} {}. {}", marker, answer_label(i).unwrap_or('?'), answer.answer);
        }

        let input = ctx.prompt.ask("Answer (letter, < for previous)").await?;
        if input == "<" {
            if let Err(e) = engine.previous() {
                println!("{}", e);
            }
            continue;
        }

        let step = match label_index(&input) {
            Some(index) => engine.select_answer(index).and_then(|_| engine.next()),
            None if input.is_empty() => engine.next(),
            None => {
                println!("Answer with a letter");
                continue;
            }
        };
        if let Err(e) = step {
            println!("{}", e);
        }
    }

    let total = engine.total_points();
    println!();
    println!("Tổng số điểm của bạn: {}", total);
    if let Some(level) = engine.level() {
        println!("Đánh giá: {}", level);
    }

    let defaults = Submitter::from_session(ctx.sessions.current());
    let submitter = Submitter {
        full_name: ctx.prompt.ask_or("Full name", &defaults.full_name).await?,
        email: ctx.prompt.ask_or("Email", &defaults.email).await?,
    };

    let result = service.submit(&engine, &submitter).await;
    println!("{}", submission_notice(&result));
    Ok(())
}

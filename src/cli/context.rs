//! paco context and ask command implementations.

use serde::Serialize;

use crate::cli::Globals;
use crate::context::{assemble, AssembledContext};
use crate::error::{Error, Result};
use crate::llm::{ask_system_prompt, LlmClient};
use crate::output::emit_success;

pub struct AskOptions {
    pub project: String,
    pub question: String,
    pub model: Option<String>,
    pub force: bool,
    pub llm_bin: String,
}

#[derive(Serialize)]
struct AskOutput<'a> {
    project: &'a str,
    model: &'a str,
    question: &'a str,
    response: String,
    size_kb: f64,
    max_prompt_kb: f64,
    forced: bool,
}

fn size_report(context: &AssembledContext) -> String {
    format!(
        "context: {:.1}KB of {}KB, {}/{} active tasks",
        context.size_kb, context.max_prompt_kb, context.tasks_included, context.tasks_total
    )
}

pub fn run_context(globals: &Globals, project: &str) -> Result<()> {
    let project = globals.project(project)?;
    let config = globals.config()?;
    let context = assemble(&project, &config)?;

    let options = globals.output();
    if options.json {
        return emit_success(options, "context", &context, None);
    }

    print!("{}", context.text);
    if !options.quiet {
        eprintln!("{}", size_report(&context));
        if !context.within_limit {
            eprintln!(
                "warning: context exceeds max_prompt_kb ({:.1}KB > {}KB)",
                context.size_kb, context.max_prompt_kb
            );
        }
    }
    Ok(())
}

pub fn run_ask(globals: &Globals, options: AskOptions) -> Result<()> {
    let question = options.question.trim();
    if question.is_empty() {
        return Err(Error::InvalidArgument("question cannot be empty".to_string()));
    }

    let project = globals.project(&options.project)?;
    let config = globals.config()?;
    let context = assemble(&project, &config)?;

    if !context.within_limit {
        if !options.force {
            return Err(Error::PromptTooLarge {
                size_kb: context.size_kb,
                max_kb: context.max_prompt_kb,
            });
        }
        tracing::warn!(
            size_kb = context.size_kb,
            max_prompt_kb = context.max_prompt_kb,
            "sending over-limit context"
        );
    }

    let model = options.model.as_deref().unwrap_or(&config.model);
    let client = LlmClient::new(options.llm_bin);
    let system_prompt = ask_system_prompt(&context.text);
    let response = client.generate(question, model, Some(&system_prompt));

    let output_options = globals.output();
    if output_options.json {
        let output = AskOutput {
            project: project.name(),
            model,
            question,
            response,
            size_kb: context.size_kb,
            max_prompt_kb: context.max_prompt_kb,
            forced: !context.within_limit,
        };
        return emit_success(output_options, "ask", &output, None);
    }

    if !output_options.quiet {
        eprintln!("{}", size_report(&context));
    }
    println!("{}", response);
    Ok(())
}

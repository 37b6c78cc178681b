/*
[INPUT]:  Worker input via the terminal (credentials, task choice, barcodes)
[OUTPUT]: Drives CollectorApp and TaskSession through a full shift
[POS]:    CLI interactive flow
[UPDATE]: When screens, scan-loop commands or prompts change
*/

use anyhow::Result;
use collector_session::session::ConfirmationToken;
use collector_session::{
    CollectorApp, ConfirmAction, ResolvedView, ScanResult, SessionError, SettingsStore,
    StartOutcome, TaskSession, TerminalOutcome, worker_message,
};
use console::style;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};
use tracing::debug;

use super::{print_task, task_line};

const CMD_PAUSE: &str = ":p";
const CMD_FINISH: &str = ":f";
const CMD_CANCEL: &str = ":c";
const CMD_NEW_BOX: &str = ":n";
const CMD_LEAVE: &str = ":q";

pub async fn run_interactive<S: SettingsStore>(app: &mut CollectorApp<S>) -> Result<()> {
    let theme = ColorfulTheme::default();
    println!("{}", style("WMS Coletor").bold().cyan());

    if !ensure_tenant(app, &theme).await? {
        return Ok(());
    }
    let Some(view) = sign_in(app, &theme).await? else {
        return Ok(());
    };

    let mut resume = match view {
        ResolvedView::ActiveSession(task) => Some(task),
        ResolvedView::ListOfTasks(_) => None,
    };

    loop {
        if let Some(task) = resume.take() {
            let session = app.resume_task(task)?;
            run_session(app, session, &theme).await?;
            continue;
        }

        let tasks = match app.refresh_list().await {
            Ok(tasks) => tasks,
            Err(err) => {
                print_failure(&worker_message(&err));
                Vec::new()
            }
        };

        let mut items: Vec<String> = tasks.iter().map(task_line).collect();
        let refresh_index = items.len();
        items.push("Atualizar lista".to_string());
        items.push("Sair".to_string());

        if tasks.is_empty() {
            println!("{}", style("Nenhuma tarefa disponível.").yellow());
        }
        let selection = Select::with_theme(&theme)
            .with_prompt("Selecione a tarefa")
            .items(&items)
            .default(0)
            .interact()?;

        if selection == refresh_index {
            continue;
        }
        if selection > refresh_index {
            if let Err(err) = app.logout().await {
                print_failure(&worker_message(&err));
            }
            return Ok(());
        }

        match app.select_task(&tasks[selection]).await {
            Ok(StartOutcome::Started(session)) => run_session(app, session, &theme).await?,
            Ok(StartOutcome::Rejected { message }) => print_failure(&message),
            Err(err) => print_failure(&worker_message(&err)),
        }
    }
}

/// Settings screen; returns false when the worker gives up
async fn ensure_tenant<S: SettingsStore>(
    app: &mut CollectorApp<S>,
    theme: &ColorfulTheme,
) -> Result<bool> {
    loop {
        let status = app.tenant_status().await;
        if status.validated_code.is_some() && !status.service_url.is_empty() {
            return Ok(true);
        }

        println!("{}", style("Configuração").bold());
        let url: String = Input::with_theme(theme)
            .with_prompt("URL de serviços")
            .with_initial_text(status.service_url)
            .interact_text()?;
        let tenant: String = Input::with_theme(theme)
            .with_prompt("Tenant")
            .with_initial_text(status.tenant_input)
            .interact_text()?;

        match app.configure(&url, &tenant).await {
            Ok(code) => {
                println!("{} {}", style("Tenant validado:").green(), style(code).bold());
                return Ok(true);
            }
            Err(err) => {
                print_failure(&worker_message(&err));
                if !retry(theme)? {
                    return Ok(false);
                }
            }
        }
    }
}

async fn sign_in<S: SettingsStore>(
    app: &mut CollectorApp<S>,
    theme: &ColorfulTheme,
) -> Result<Option<ResolvedView>> {
    loop {
        let user: String = Input::with_theme(theme)
            .with_prompt("Usuário")
            .interact_text()?;
        let password = Password::with_theme(theme)
            .with_prompt("Senha")
            .interact()?;

        match app.login(&user, &password).await {
            Ok(view) => return Ok(Some(view)),
            Err(err) => {
                print_failure(&worker_message(&err));
                if !retry(theme)? {
                    return Ok(None);
                }
            }
        }
    }
}

/// Execution screen: scan loop until the session ends or the worker leaves
async fn run_session<S: SettingsStore>(
    app: &mut CollectorApp<S>,
    mut session: TaskSession,
    theme: &ColorfulTheme,
) -> Result<()> {
    loop {
        session.settle();
        let Some(task) = session.task() else {
            break;
        };
        println!();
        print_task(task);
        print_actions(&session);
        if let Some(message) = session.message() {
            print_result(message);
        }

        let input: String = Input::with_theme(theme)
            .with_prompt("Código")
            .allow_empty(true)
            .interact_text()?;

        let outcome = match input.trim() {
            CMD_LEAVE => break,
            CMD_PAUSE => session.pause().await.map(Some),
            CMD_FINISH => match session.request_finish() {
                Ok(token) => confirm_terminal(&mut session, token, theme).await?,
                Err(err) => Err(err),
            },
            CMD_CANCEL => match session.request_cancel() {
                Ok(token) => confirm_terminal(&mut session, token, theme).await?,
                Err(err) => Err(err),
            },
            CMD_NEW_BOX => {
                let reply = session.new_box().await;
                refocus_after(&session, reply).await
            }
            "" => continue,
            code => {
                let reply = session.scan(code).await;
                refocus_after(&session, reply).await
            }
        };

        match outcome {
            Ok(Some(TerminalOutcome::Exited(exit))) => debug!(?exit, "session exited"),
            Ok(_) => {}
            Err(err) => print_failure(&err.user_message()),
        }
    }

    if let Some(message) = app.leave_session(session)? {
        println!("{}", style(message).green());
    }
    Ok(())
}

/// Hold the next barcode prompt until the refocus delay has passed
async fn refocus_after(
    session: &TaskSession,
    reply: Result<ScanResult, SessionError>,
) -> Result<Option<TerminalOutcome>, SessionError> {
    let reply = reply?;
    let refocused = session
        .schedule_refocus(move || debug!(success = reply.success, "barcode input refocused"))
        .await
        .unwrap_or(false);
    if !refocused {
        debug!("refocus skipped");
    }
    Ok(None)
}

async fn confirm_terminal(
    session: &mut TaskSession,
    token: ConfirmationToken,
    theme: &ColorfulTheme,
) -> Result<Result<Option<TerminalOutcome>, SessionError>> {
    let confirmed = Confirm::with_theme(theme)
        .with_prompt(format!("{} - {}", token.title(), token.prompt()))
        .default(false)
        .interact()?;
    if !confirmed {
        return Ok(Ok(None));
    }
    let outcome = match token.action() {
        ConfirmAction::Finish => session.confirm_finish(token).await,
        ConfirmAction::Cancel => session.confirm_cancel(token).await,
    };
    Ok(outcome.map(Some))
}

fn print_actions(session: &TaskSession) {
    let actions = session.available_actions();
    let mut hints = vec![format!("{CMD_PAUSE} pausar")];
    if actions.finish {
        hints.push(format!("{CMD_FINISH} encerrar"));
    }
    if actions.cancel {
        hints.push(format!("{CMD_CANCEL} cancelar"));
    }
    if actions.new_box {
        hints.push(format!("{CMD_NEW_BOX} nova caixa"));
    }
    hints.push(format!("{CMD_LEAVE} voltar"));
    println!("{}", style(hints.join("  ")).dim());
}

fn print_result(result: &ScanResult) {
    if result.success {
        println!("{}", style(&result.message).green().bold());
    } else {
        print_failure(&result.message);
    }
}

fn print_failure(message: &str) {
    println!("{}", style(message).red());
}

fn retry(theme: &ColorfulTheme) -> Result<bool> {
    Ok(Confirm::with_theme(theme)
        .with_prompt("Tentar novamente?")
        .default(true)
        .interact()?)
}


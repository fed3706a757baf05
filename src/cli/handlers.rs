//! Command execution.

use std::io::Read;
use std::path::Path;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{Cli, Command, Credentials, ParksCommand, QuestionsCommand, ReportKind, SchemaDocument};
use crate::ahp::{
    aggregate_consensus, evaluate, evaluate_matrix, CriteriaSet, PairwiseAnswer, PairwiseMatrix,
};
use crate::auth::{Authenticator, Section, Session};
use crate::error::{AhpError, AppError};
use crate::survey::{Park, Question, Registration};
use crate::traits::{SecretProvider, StorageTrait, TimeProvider};
use crate::workshop::{AhpSubmission, ParkEvaluationInput, WorkshopService, WorkshopSettings};

/// Input of the `weights` command.
///
/// Either `answers` or `matrix` is used; `matrix` wins when both are given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeightsRequest {
    /// Criteria; the green-space set when absent.
    #[serde(default)]
    pub criteria: Option<CriteriaSet>,
    /// Pairwise answers.
    #[serde(default)]
    pub answers: Vec<PairwiseAnswer>,
    /// A complete pairwise matrix.
    #[serde(default)]
    #[schemars(with = "Option<Vec<Vec<f64>>>")]
    pub matrix: Option<PairwiseMatrix>,
}

/// Input of `aggregate --input`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRequest {
    /// Criteria; the green-space set when absent.
    #[serde(default)]
    pub criteria: Option<CriteriaSet>,
    /// Respondent matrices.
    pub matrices: Vec<PairwiseMatrix>,
}

/// Parse a JSON document from `path`, or stdin for `None` and `-`.
///
/// # Errors
///
/// Returns [`AppError::Input`] if the document cannot be read or parsed.
pub fn read_json<T: DeserializeOwned>(path: Option<&Path>) -> Result<T, AppError> {
    let (source, text) = match path {
        Some(p) if p != Path::new("-") => {
            let text = std::fs::read_to_string(p).map_err(|e| AppError::Input {
                message: format!("cannot read {}: {e}", p.display()),
            })?;
            (p.display().to_string(), text)
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| AppError::Input {
                    message: format!("cannot read stdin: {e}"),
                })?;
            ("stdin".to_string(), text)
        }
    };

    serde_json::from_str(&text).map_err(|e| AppError::Input {
        message: format!("invalid JSON in {source}: {e}"),
    })
}

/// Run a command against the workshop service.
///
/// # Errors
///
/// Returns [`AppError`] from authorization, input parsing or the command
/// itself.
pub async fn run<S, T, P>(
    cli: &Cli,
    service: &WorkshopService<S, T>,
    auth: &Authenticator<P>,
) -> Result<Value, AppError>
where
    S: StorageTrait,
    T: TimeProvider,
    P: SecretProvider,
{
    if !cli.command.needs_storage() {
        return run_standalone(cli, service.settings(), auth);
    }

    let session = match cli.command.section() {
        Some(section) => Some(authorize(auth, &cli.credentials, section)?),
        None => None,
    };

    match &cli.command {
        Command::Register { input } => {
            let mut registration: Registration = read_json(input.as_deref())?;
            if let Some(session) = &session {
                if registration.neighborhood.trim().is_empty() {
                    registration.neighborhood.clone_from(&session.neighborhood);
                }
            }
            render(&service.register(&registration).await?)
        }
        Command::Questions { action } => match action {
            QuestionsCommand::Add { input } => {
                let question: Question = read_json(input.as_deref())?;
                service.add_question(&question).await?;
                render(&question)
            }
            QuestionsCommand::List { neighborhood } => {
                render(&service.questions(neighborhood).await?)
            }
        },
        Command::Survey { input } => {
            let submission: AhpSubmission = read_json(input.as_deref())?;
            render(&service.submit_ahp(&submission).await?)
        }
        Command::Parks { action } => match action {
            ParksCommand::Add { input } => {
                let park: Park = read_json(input.as_deref())?;
                service.add_park(&park).await?;
                render(&park)
            }
            ParksCommand::List => render(&service.parks().await?),
        },
        Command::Evaluate { input } => {
            let evaluation: ParkEvaluationInput = read_json(input.as_deref())?;
            render(&service.submit_park_evaluations(&evaluation).await?)
        }
        Command::Aggregate { round_table, .. } => {
            render(&service.consensus(round_table.clone()).await?)
        }
        Command::Report { kind, round_table } => match kind {
            ReportKind::Tables => render(&service.table_statistics().await?),
            ReportKind::Anova => render(&service.table_anova().await?),
            ReportKind::Parks => render(&service.park_report(round_table.clone()).await?),
        },
        Command::Weights { .. } | Command::Login { .. } | Command::Schema { .. } => {
            run_standalone(cli, service.settings(), auth)
        }
    }
}

/// Run a command that needs no database.
///
/// # Errors
///
/// Returns [`AppError::Input`] for a command that needs the database, and
/// the command's own errors otherwise.
pub fn run_standalone<P: SecretProvider>(
    cli: &Cli,
    settings: &WorkshopSettings,
    auth: &Authenticator<P>,
) -> Result<Value, AppError> {
    match &cli.command {
        Command::Weights { input } => {
            let request: WeightsRequest = read_json(input.as_deref())?;
            weights(&request, settings)
        }
        Command::Aggregate {
            input: Some(path), ..
        } => {
            let request: AggregateRequest = read_json(Some(path.as_path()))?;
            aggregate(&request, settings)
        }
        Command::Login { round_table } => {
            let Credentials {
                user,
                password,
                neighborhood,
            } = &cli.credentials;
            let (Some(user), Some(password)) = (user, password) else {
                return Err(missing_credentials("login"));
            };
            let mut session = auth.open_session(user, password, neighborhood.trim())?;
            if let Some(table) = round_table {
                session = session.with_round_table(table.trim());
            }
            Ok(json!({
                "session": session,
                "sections": session.role.sections(),
            }))
        }
        Command::Schema { document } => schema(*document),
        _ => Err(AppError::Input {
            message: "this command needs the workshop database".into(),
        }),
    }
}

/// Evaluate one questionnaire or matrix.
///
/// # Errors
///
/// Returns [`AppError::Ahp`] for invalid answers or matrices.
pub fn weights(request: &WeightsRequest, settings: &WorkshopSettings) -> Result<Value, AppError> {
    let criteria = request.criteria.as_ref().unwrap_or(&settings.criteria);
    let evaluation = match &request.matrix {
        Some(matrix) => evaluate_matrix(criteria, matrix.clone(), settings.eigen)?,
        None => evaluate(
            criteria,
            &request.answers,
            settings.missing_answer_policy,
            settings.eigen,
        )?,
    };

    Ok(json!({
        "weights": evaluation.weights.labelled(criteria),
        "ranking": evaluation.ranked(),
        "consistency": evaluation.consistency,
        "acceptable": evaluation.consistency.is_acceptable(),
        "matrix": evaluation.matrix,
    }))
}

/// Aggregate matrices given on the command line.
///
/// # Errors
///
/// Returns [`AppError::Ahp`] for an empty or mismatched set of matrices.
pub fn aggregate(request: &AggregateRequest, settings: &WorkshopSettings) -> Result<Value, AppError> {
    let criteria = request.criteria.as_ref().unwrap_or(&settings.criteria);
    if let Some(bad) = request.matrices.iter().find(|m| m.size() != criteria.len()) {
        return Err(AhpError::DimensionMismatch {
            expected: criteria.len(),
            found: bad.size(),
        }
        .into());
    }

    let group = aggregate_consensus(
        &request.matrices,
        settings.consistency_threshold,
        settings.eigen,
    )?;

    Ok(json!({
        "respondents": group.included.len(),
        "excluded": group.excluded,
        "weights": group.weights.labelled(criteria),
        "consistency": group.consistency,
        "matrix": group.matrix,
    }))
}

fn schema(document: SchemaDocument) -> Result<Value, AppError> {
    let schema = match document {
        SchemaDocument::Weights => schemars::schema_for!(WeightsRequest),
        SchemaDocument::Registration => schemars::schema_for!(Registration),
        SchemaDocument::Question => schemars::schema_for!(Question),
        SchemaDocument::Survey => schemars::schema_for!(AhpSubmission),
        SchemaDocument::Park => schemars::schema_for!(Park),
        SchemaDocument::Evaluation => schemars::schema_for!(ParkEvaluationInput),
    };
    render(&schema)
}

fn authorize<P: SecretProvider>(
    auth: &Authenticator<P>,
    credentials: &Credentials,
    section: Section,
) -> Result<Session, AppError> {
    let (Some(user), Some(password)) = (&credentials.user, &credentials.password) else {
        return Err(missing_credentials(&section.to_string()));
    };
    let session = auth.open_session(user, password, credentials.neighborhood.trim())?;
    session.require(section)?;
    Ok(session)
}

fn missing_credentials(what: &str) -> AppError {
    AppError::Input {
        message: format!("--user and --password are required for {what}"),
    }
}

fn render<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Output {
        message: e.to_string(),
    })
}

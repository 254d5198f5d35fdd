//! One-time starter dataset for a fresh database.
//!
//! Seeding only happens when the subject collection is empty, so user data
//! is never touched by a repeated run.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use plan_core::model::{Subject, SubjectError, SubjectId, Topic, TopicError, TopicId};

use crate::repository::{Storage, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Subject(#[from] SubjectError),
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error("invalid fixture date: {0}")]
    FixtureDate(String),
}

/// What `seed_if_empty` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { subjects: usize, topics: usize },
    AlreadyPopulated,
}

struct SubjectFixture {
    name: &'static str,
    exam_date: &'static str,
    units: &'static [(&'static str, &'static str)],
}

const FIXTURES: &[SubjectFixture] = &[
    SubjectFixture {
        name: "Machine Learning (CS-601)",
        exam_date: "2025-06-05T00:00:00Z",
        units: &[
            (
                "UNIT-1",
                "Introduction, scope and limitations, regression, probability and \
                 linear algebra for ML, data preprocessing, supervised and \
                 unsupervised learning.",
            ),
            (
                "UNIT-2",
                "Activation functions, loss functions, gradient descent, \
                 backpropagation, regularization, hyper-parameter tuning.",
            ),
            (
                "UNIT-3",
                "Convolutional networks: padding, stride, pooling, inception, \
                 transfer learning, CNN frameworks.",
            ),
            (
                "UNIT-4",
                "Recurrent networks, LSTM and GRU, attention, reinforcement \
                 learning: MDPs, Q-learning, SARSA.",
            ),
            (
                "UNIT-5",
                "Support vector machines, Bayesian learning, applications in \
                 vision, speech and NLP.",
            ),
        ],
    },
    SubjectFixture {
        name: "Computer Network (CS-602)",
        exam_date: "2025-06-11T00:00:00Z",
        units: &[
            (
                "UNIT-1",
                "Network goals, components and classification, layered \
                 architecture, ISO/OSI vs TCP/IP, physical layer principles.",
            ),
            (
                "UNIT-2",
                "Data link layer: framing, flow and error control, sliding \
                 window protocols, ARP/RARP.",
            ),
            (
                "UNIT-3",
                "MAC sublayer: contention schemes (ALOHA, CSMA variants), \
                 collision-free protocols, IEEE 802 standards.",
            ),
            (
                "UNIT-4",
                "Network layer: routing algorithms, IP addressing, \
                 fragmentation, ICMP, IPv4 vs IPv6.",
            ),
            (
                "UNIT-5",
                "Transport layer: UDP and TCP, flow and congestion control, \
                 application layer protocols and DNS.",
            ),
        ],
    },
    SubjectFixture {
        name: "Compiler Design (CS-603)",
        exam_date: "2025-06-16T00:00:00Z",
        units: &[
            (
                "UNIT-1",
                "Compiler structure, analysis-synthesis model, phases, lexical \
                 analysis and LEX.",
            ),
            (
                "UNIT-2",
                "Syntax analysis: CFGs, top-down and bottom-up parsing, LR \
                 parsers, syntax-directed definitions.",
            ),
            (
                "UNIT-3",
                "Type checking, run-time environments, storage allocation, \
                 symbol tables, error recovery.",
            ),
            (
                "UNIT-4",
                "Intermediate code generation, back patching, basic blocks and \
                 flow graphs, register allocation, peephole optimization.",
            ),
            (
                "UNIT-5",
                "Code optimization: loop optimization, dead code elimination, \
                 global data flow analysis.",
            ),
        ],
    },
    SubjectFixture {
        name: "Project Management (CS-604)",
        exam_date: "2025-06-20T00:00:00Z",
        units: &[
            (
                "UNIT-1",
                "Software economics, reducing product size, team effectiveness, \
                 principles of modern software management.",
            ),
            (
                "UNIT-2",
                "Life cycle phases, artifacts of the process, model-based \
                 architectures, workflows and checkpoints.",
            ),
            (
                "UNIT-3",
                "Iterative process planning, project organisations, process \
                 automation, core metrics and management indicators.",
            ),
        ],
    },
];

fn fixture_date(raw: &str) -> Result<DateTime<Utc>, SeedError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| SeedError::FixtureDate(raw.to_owned()))
}

/// Populate the starter subjects and topics, but only into an empty store.
///
/// # Errors
///
/// Returns `SeedError` if repository access fails or a fixture row is
/// malformed.
pub async fn seed_if_empty(storage: &Storage) -> Result<SeedOutcome, SeedError> {
    if !storage.subjects.list_subjects().await?.is_empty() {
        info!("subjects already present, skipping seed");
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    let mut subjects = 0_usize;
    let mut topics = 0_usize;

    for fixture in FIXTURES {
        let subject = Subject::new(
            SubjectId::random(),
            fixture.name,
            fixture_date(fixture.exam_date)?,
        )?;
        storage.subjects.upsert_subject(&subject).await?;
        subjects += 1;

        for (unit, description) in fixture.units {
            let topic = Topic::new(TopicId::random(), subject.id(), *unit, *description, None)?;
            storage.topics.upsert_topic(&topic).await?;
            topics += 1;
        }
    }

    info!(subjects, topics, "seeded starter dataset");
    Ok(SeedOutcome::Seeded { subjects, topics })
}

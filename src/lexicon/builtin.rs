//! Compact synset table compiled into the crate.
//!
//! Covers the vocabulary that dominates job descriptions: roles, seniority,
//! common skills and the verbs resumes use to describe work. Lemmas follow
//! WordNet conventions (`_` joins multi-word lemmas).

use super::{PartOfSpeech, Synset, SynsetTable};
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::PartOfSpeech::{Adjective as A, Noun as N, Verb as V};

const SYNSETS: &[(PartOfSpeech, &[&str])] = &[
    // Roles
    (N, &["developer", "programmer", "coder", "software_engineer", "software_developer"]),
    (N, &["engineer", "technologist"]),
    (N, &["architect", "designer"]),
    (N, &["manager", "director", "supervisor", "lead"]),
    (N, &["analyst", "researcher", "investigator"]),
    (N, &["administrator", "admin", "sysadmin"]),
    (N, &["tester", "qa", "quality_assurance"]),
    (N, &["intern", "trainee", "apprentice"]),
    (N, &["consultant", "advisor", "adviser"]),
    (N, &["frontend", "front_end", "client_side"]),
    (N, &["backend", "back_end", "server_side"]),
    (N, &["fullstack", "full_stack"]),
    (N, &["devops", "sre", "site_reliability_engineering", "platform_engineering"]),
    // Seniority and experience
    (A, &["senior", "sr", "experienced", "seasoned", "veteran"]),
    (A, &["junior", "jr", "entry_level"]),
    (A, &["skilled", "proficient", "adept", "expert"]),
    (N, &["experience", "background", "track_record"]),
    (N, &["degree", "diploma", "qualification"]),
    (N, &["certification", "certificate", "credential"]),
    // Technology
    (N, &["database", "db", "datastore", "data_store"]),
    (N, &["postgresql", "postgres"]),
    (N, &["javascript", "js", "ecmascript"]),
    (N, &["typescript", "ts"]),
    (N, &["golang", "go"]),
    (N, &["kubernetes", "k8s"]),
    (N, &["node", "nodejs"]),
    (N, &["react", "reactjs"]),
    (N, &["aws", "amazon_web_services"]),
    (N, &["gcp", "google_cloud"]),
    (N, &["cloud", "cloud_computing"]),
    (N, &["ml", "machine_learning"]),
    (N, &["ai", "artificial_intelligence"]),
    (N, &["api", "interface", "endpoint"]),
    (N, &["microservice", "service"]),
    (N, &["ci", "continuous_integration"]),
    (N, &["cd", "continuous_delivery", "continuous_deployment"]),
    (N, &["test", "testing", "trial"]),
    (N, &["repository", "repo", "codebase"]),
    (N, &["documentation", "docs", "doc"]),
    (N, &["analytics", "analysis", "reporting"]),
    (N, &["security", "cybersecurity", "infosec"]),
    (N, &["game", "gaming", "video_game"]),
    (N, &["team", "squad", "group"]),
    (N, &["client", "customer"]),
    (N, &["stakeholder", "partner"]),
    (N, &["communication", "communicating"]),
    (N, &["leadership", "direction", "guidance"]),
    (N, &["teamwork", "collaboration", "cooperation"]),
    // Work verbs
    (V, &["develop", "build", "create", "make"]),
    (V, &["design", "architect", "plan"]),
    (V, &["manage", "lead", "oversee", "supervise", "direct"]),
    (V, &["implement", "execute", "deliver", "ship"]),
    (V, &["maintain", "support", "sustain"]),
    (V, &["optimize", "optimise", "improve", "tune"]),
    (V, &["deploy", "release", "launch"]),
    (V, &["collaborate", "cooperate", "partner"]),
    (V, &["analyze", "analyse", "evaluate", "assess"]),
    (V, &["automate", "script"]),
    (V, &["mentor", "coach", "train"]),
    (V, &["debug", "troubleshoot", "fix", "resolve"]),
    (V, &["test", "verify", "validate"]),
    (V, &["communicate", "present", "convey"]),
    (V, &["game", "play"]),
    // Qualities
    (A, &["scalable", "elastic"]),
    (A, &["reliable", "dependable", "robust"]),
    (A, &["remote", "distributed", "telecommute"]),
    (A, &["agile", "nimble"]),
];

// Irregular forms the suffix rules cannot reach.
const EXCEPTIONS: &[(PartOfSpeech, &str, &str)] = &[
    (V, "built", "build"),
    (V, "made", "make"),
    (V, "led", "lead"),
    (V, "shipped", "ship"),
    (V, "shipping", "ship"),
    (V, "planned", "plan"),
    (V, "planning", "plan"),
    (N, "analyses", "analysis"),
];

static BUILTIN: Lazy<Arc<SynsetTable>> = Lazy::new(|| {
    let mut table = SynsetTable::new("builtin");
    for (pos, lemmas) in SYNSETS {
        table.insert(Synset {
            pos: *pos,
            lemmas: lemmas.iter().map(|l| l.to_string()).collect(),
        });
    }
    for (pos, inflected, base) in EXCEPTIONS {
        table.insert_exception(*pos, inflected, base);
    }
    Arc::new(table)
});

/// The shared built-in table. Built once per process.
pub fn builtin() -> Arc<SynsetTable> {
    Arc::clone(&BUILTIN)
}

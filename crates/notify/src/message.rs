//! Per-family message rendering.
//!
//! Each observation family has a fixed template: a plain-text line plus a
//! mrkdwn section block linking the relevant upstream page. Link targets
//! come from config (repository identifiers, program addresses); when a
//! target cannot be resolved the plain text is sent without blocks.

use chainwatch_core::Config;
use chainwatch_store::Observation;

use crate::traits::Notification;

fn mrkdwn_section(text: String) -> serde_json::Value {
    serde_json::json!([
        {
            "type": "section",
            "text": { "type": "mrkdwn", "text": text }
        }
    ])
}

/// Render the outbound message for one observation.
pub fn render(observation: &Observation, config: &Config) -> Notification {
    match observation {
        Observation::ClusterVersion { cluster, version } => {
            let text = format!("New Solana version {version} is available on {cluster} cluster!");
            let blocks = mrkdwn_section(text.clone());
            Notification::with_blocks(text, blocks)
        }

        Observation::RepositoryTag { repository, tag } => {
            let text = format!("New {repository} version {tag} was tagged in GitHub!");
            match config.repositories.get(repository) {
                Some(identifier) => {
                    let blocks = mrkdwn_section(format!(
                        "New <https://github.com/{identifier}|{repository}> was \
                         <https://github.com/{identifier}/tree/{tag}|tagged> in GitHub!"
                    ));
                    Notification::with_blocks(text, blocks)
                }
                // Repository no longer tracked; backlog rows still drain.
                None => Notification::text_only(text),
            }
        }

        Observation::ProgramDeployment {
            program,
            cluster,
            slot,
        } => {
            let text = format!("New {program} version {slot} was deployed in {cluster}!");
            let address = config
                .programs
                .get(program)
                .and_then(|a| a.for_cluster(cluster));
            match address {
                Some(address) => {
                    let blocks = mrkdwn_section(format!(
                        "New <https://explorer.solana.com/address/{address}?cluster={cluster}|{program}> \
                         version was deployed in \
                         <https://explorer.solana.com/?cluster={cluster}|cluster> on {slot} slot!"
                    ));
                    Notification::with_blocks(text, blocks)
                }
                None => Notification::text_only(text),
            }
        }
    }
}

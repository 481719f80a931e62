//! Query topics loading.
//!
//! Topics files carry one query per line as `queryId<TAB>queryText`. Only the
//! first tab splits the record, so query text may itself contain tabs.

use crate::error::Result;
use crate::eval::Qrels;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One evaluation query: identifier plus the text sent to the search service.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub query_id: String,
    pub text: String,
}

/// Load topics from a file.
pub fn load_topics(path: &Path) -> Result<Vec<Topic>> {
    let file = std::fs::File::open(path)?;
    topics_from_reader(BufReader::new(file))
}

/// Load topics from any buffered reader. Lines without a tab separator or
/// with an empty id or text are skipped with a warning, the same noise
/// tolerance the judgment loader applies.
pub fn topics_from_reader<R: BufRead>(reader: R) -> Result<Vec<Topic>> {
    let mut topics = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match line.split_once('\t') {
            Some((id, text)) if !id.trim().is_empty() && !text.trim().is_empty() => {
                topics.push(Topic {
                    query_id: id.trim().to_string(),
                    text: text.trim().to_string(),
                });
            }
            _ => {
                log::warn!("topics line {}: skipping malformed record: {}", idx + 1, line);
            }
        }
    }

    Ok(topics)
}

/// Keep only topics whose query has at least one positively judged document.
/// Topics that cannot be scored are not worth dispatching.
pub fn filter_judged(topics: Vec<Topic>, qrels: &Qrels) -> Vec<Topic> {
    let judged = qrels.judged_query_ids();
    topics
        .into_iter()
        .filter(|t| judged.contains(t.query_id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_tab_separated_lines() {
        let topics =
            topics_from_reader(Cursor::new("1\twhat is rust\n2\tborrow checker\n")).unwrap();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].query_id, "1");
        assert_eq!(topics[0].text, "what is rust");
    }

    #[test]
    fn splits_on_first_tab_only() {
        let topics = topics_from_reader(Cursor::new("1\tleft\tright\n")).unwrap();
        assert_eq!(topics[0].text, "left\tright");
    }

    #[test]
    fn skips_malformed_lines() {
        let topics =
            topics_from_reader(Cursor::new("no tab here\n\n1\tquery text\n\tmissing id\n"))
                .unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].query_id, "1");
    }

    #[test]
    fn filter_keeps_positively_judged_topics() {
        let qrels =
            Qrels::from_reader(Cursor::new("1 0 d1 1\n2 0 d2 0\n")).unwrap();
        let topics = vec![
            Topic {
                query_id: "1".to_string(),
                text: "judged".to_string(),
            },
            Topic {
                query_id: "2".to_string(),
                text: "judged but nothing relevant".to_string(),
            },
            Topic {
                query_id: "3".to_string(),
                text: "unjudged".to_string(),
            },
        ];
        let judged = filter_judged(topics, &qrels);
        assert_eq!(judged.len(), 1);
        assert_eq!(judged[0].query_id, "1");
    }
}

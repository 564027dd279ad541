use crate::model::task::{Task, TaskKind};
use crate::parse::timestamp::format_timestamp;

/// Separator between fields of a stored task line
pub const FIELD_SEPARATOR: &str = " | ";

/// Serialize one task as a single line:
/// `<tag> | <done> | <priority> | <description>[ | <timestamp>...]`
pub fn encode_line(task: &Task) -> String {
    let mut fields = vec![
        task.kind().tag().to_string(),
        if task.is_done() { "1" } else { "0" }.to_string(),
        task.priority().ordinal().to_string(),
        task.description().to_string(),
    ];
    match task.kind() {
        TaskKind::Plain => {}
        TaskKind::Deadline { due } => fields.push(format_timestamp(due)),
        TaskKind::Ranged { start, end } => {
            fields.push(format_timestamp(start));
            fields.push(format_timestamp(end));
        }
    }
    fields.join(FIELD_SEPARATOR)
}

/// Serialize a task collection, one line per task, in order.
pub fn encode_all(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(encode_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use crate::parse::timestamp::parse_timestamp;

    #[test]
    fn test_encode_plain() {
        let task = Task::plain("read book").unwrap();
        assert_eq!(encode_line(&task), "T | 0 | 1 | read book");
    }

    #[test]
    fn test_encode_deadline_done_high() {
        let task = Task::deadline("return book", parse_timestamp("2019-12-02 1800").unwrap())
            .unwrap()
            .with_done(true)
            .with_priority(Priority::High);
        assert_eq!(encode_line(&task), "D | 1 | 2 | return book | 2019-12-02 1800");
    }

    #[test]
    fn test_encode_ranged() {
        let task = Task::ranged(
            "project meeting",
            parse_timestamp("2019-08-06 1400").unwrap(),
            parse_timestamp("2019-08-06 1600").unwrap(),
        )
        .unwrap()
        .with_priority(Priority::Low);
        assert_eq!(
            encode_line(&task),
            "E | 0 | 0 | project meeting | 2019-08-06 1400 | 2019-08-06 1600"
        );
    }

    #[test]
    fn test_encode_all_preserves_order() {
        let tasks = vec![Task::plain("b").unwrap(), Task::plain("a").unwrap()];
        assert_eq!(
            encode_all(&tasks),
            vec!["T | 0 | 1 | b".to_string(), "T | 0 | 1 | a".to_string()]
        );
    }
}

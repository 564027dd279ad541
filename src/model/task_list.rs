use super::task::Task;

/// A user-facing task number that does not name a task in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("The task list is empty")]
    EmptyList { index: i64 },
    #[error("Invalid task number! Please choose between 1 and {size}")]
    OutOfRange { index: i64, size: usize },
}

/// The ordered task collection. Insertion order is display order and
/// file order. Callers address tasks by 1-based number; every lookup
/// re-checks the number against the current length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        TaskList::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        TaskList { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Iterate tasks paired with their 1-based number
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Task)> {
        self.tasks.iter().enumerate().map(|(i, t)| (i + 1, t))
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Convert a 1-based task number into a storage index
    pub fn resolve(&self, number: i64) -> Result<usize, RangeError> {
        let size = self.tasks.len();
        if size == 0 {
            return Err(RangeError::EmptyList { index: number });
        }
        match usize::try_from(number) {
            Ok(n) if (1..=size).contains(&n) => Ok(n - 1),
            _ => Err(RangeError::OutOfRange {
                index: number,
                size,
            }),
        }
    }

    pub fn get(&self, number: i64) -> Result<&Task, RangeError> {
        let idx = self.resolve(number)?;
        Ok(&self.tasks[idx])
    }

    pub fn get_mut(&mut self, number: i64) -> Result<&mut Task, RangeError> {
        let idx = self.resolve(number)?;
        Ok(&mut self.tasks[idx])
    }

    pub fn remove(&mut self, number: i64) -> Result<Task, RangeError> {
        let idx = self.resolve(number)?;
        Ok(self.tasks.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(descriptions: &[&str]) -> TaskList {
        TaskList::from_tasks(
            descriptions
                .iter()
                .map(|d| Task::plain(d).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_resolve_bounds() {
        let list = list_of(&["a", "b"]);
        assert_eq!(list.resolve(1), Ok(0));
        assert_eq!(list.resolve(2), Ok(1));
        for bad in [0, -1, 3, i64::MAX] {
            assert_eq!(
                list.resolve(bad),
                Err(RangeError::OutOfRange {
                    index: bad,
                    size: 2
                })
            );
        }
    }

    #[test]
    fn test_resolve_on_empty_list() {
        let list = TaskList::new();
        assert_eq!(list.resolve(1), Err(RangeError::EmptyList { index: 1 }));
    }

    #[test]
    fn test_remove_shrinks_and_rechecks() {
        let mut list = list_of(&["a", "b"]);
        let removed = list.remove(2).unwrap();
        assert_eq!(removed.description(), "b");
        assert_eq!(list.len(), 1);
        // Number 2 was valid a moment ago
        assert!(list.get(2).is_err());
        assert_eq!(list.get(1).unwrap().description(), "a");
    }

    #[test]
    fn test_numbered_is_one_based() {
        let list = list_of(&["a", "b"]);
        let numbers: Vec<usize> = list.numbered().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_range_error_message() {
        let err = RangeError::OutOfRange { index: 5, size: 2 };
        assert_eq!(
            err.to_string(),
            "Invalid task number! Please choose between 1 and 2"
        );
    }
}

//! Interactive console menu.
//!
//! Line-oriented: every prompt reads one line. The loop runs over any async reader and
//! writer so it can be driven by stdin/stdout or by a script in tests. End of input
//! exits the loop like choosing "Exit".

use crate::{
    core::{
        grade::{Marks, SUBJECT_COUNT, parse_mark},
        service::{GradeOutcome, GradeService},
        student::DeleteOutcome,
    },
    entities::student,
    errors::Result,
};
use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{debug, info};

const MENU: &str = "\n=== Student Grade Generation System ===\n\
1. Add New Student\n\
2. View All Students\n\
3. Delete Student\n\
4. Clear All Students\n\
5. Exit\n";

const TABLE_RULE: &str = "------------------------------------------------------------";

/// Formats the result block printed after adding a student.
#[must_use]
pub fn format_outcome(outcome: &GradeOutcome) -> String {
    let student = &outcome.student;
    format!(
        "Student ID: {}\nName: {}\nTotal: {}\nAverage: {}\nGrade: {}\n{}\n",
        student.student_id,
        student.name,
        student.total,
        student.average,
        student.grade,
        outcome.message()
    )
}

/// Formats all students as a fixed-width table with a count footer.
#[must_use]
pub fn format_student_table(students: &[student::Model]) -> String {
    if students.is_empty() {
        return "No students found in the database.\n".to_string();
    }

    let mut table = String::from("\n=== All Stored Students ===\n");
    // Writing into a String cannot fail.
    let _ = writeln!(
        table,
        "{:<12} {:<20} {:<8} {:<8} {:<6}",
        "Student ID", "Name", "Total", "Average", "Grade"
    );
    let _ = writeln!(table, "{TABLE_RULE}");
    for s in students {
        let _ = writeln!(
            table,
            "{:<12} {:<20} {:<8} {:<8} {:<6}",
            s.student_id, s.name, s.total, s.average, s.grade
        );
    }
    let _ = writeln!(table, "{TABLE_RULE}");
    let _ = writeln!(table, "Total Students in Database: {}", students.len());
    table
}

/// Menu loop state: the service plus the line source and sink.
pub struct Console<'a, R, W> {
    service: &'a GradeService,
    lines: Lines<R>,
    output: W,
}

impl<'a, R, W> Console<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a console over `input` and `output`.
    pub fn new(service: &'a GradeService, input: R, output: W) -> Self {
        Self {
            service,
            lines: input.lines(),
            output,
        }
    }

    /// Gives back the output sink, e.g. to inspect what a test session printed.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the menu until "Exit" or end of input.
    pub async fn run(&mut self) -> Result<()> {
        info!("Console session started");
        loop {
            self.write(MENU).await?;
            let Some(choice) = self.prompt("Enter your choice (1-5): ").await? else {
                break;
            };

            let keep_going = match choice.trim() {
                "1" => self.add_student().await?,
                "2" => self.view_students().await?,
                "3" => self.delete_student().await?,
                "4" => self.clear_students().await?,
                "5" => {
                    self.write("Thank you for using the system!\n").await?;
                    false
                }
                other => {
                    debug!("Invalid menu choice {:?}", other);
                    self.write("Invalid choice! Please enter 1-5.\n").await?;
                    true
                }
            };

            if !keep_going {
                break;
            }
        }
        info!("Console session ended");
        Ok(())
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Prints `text` and reads one line; `None` at end of input.
    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.write(text).await?;
        Ok(self.lines.next_line().await?)
    }

    /// Returns `false` when input ended mid-entry.
    async fn add_student(&mut self) -> Result<bool> {
        self.write("\n=== Add New Student ===\n").await?;
        let Some(name) = self.prompt("Enter student name: ").await? else {
            return Ok(false);
        };

        self.write("Enter marks for 5 subjects (0-100):\n").await?;
        let mut raw = [0; SUBJECT_COUNT];
        for (i, mark) in raw.iter_mut().enumerate() {
            let Some(line) = self.prompt(&format!("Subject {}: ", i + 1)).await? else {
                return Ok(false);
            };
            *mark = parse_mark(Some(&line));
        }

        let result = self
            .service
            .process_new_student(name.trim(), Marks(raw))
            .await;
        self.write("\n=== Result ===\n").await?;
        match result {
            Ok(outcome) => self.write(&format_outcome(&outcome)).await?,
            Err(e) => self.write(&format!("Error: {e}\n")).await?,
        }
        Ok(true)
    }

    async fn view_students(&mut self) -> Result<bool> {
        let students = self.service.all_students().await;
        self.write(&format_student_table(&students)).await?;
        Ok(true)
    }

    async fn delete_student(&mut self) -> Result<bool> {
        self.write("\n=== Delete Student ===\n").await?;
        let Some(student_id) = self.prompt("Enter Student ID to delete: ").await? else {
            return Ok(false);
        };
        let student_id = student_id.trim();

        let message = if student_id.is_empty() {
            "Student ID is required".to_string()
        } else {
            match self.service.delete_student(student_id).await {
                Ok(DeleteOutcome::Deleted) => {
                    format!("Student with ID {student_id} deleted successfully")
                }
                Ok(DeleteOutcome::NotFound) => format!("Student with ID {student_id} not found"),
                Err(e) => format!("Error deleting student: {e}"),
            }
        };
        self.write(&format!("{message}\n")).await?;
        Ok(true)
    }

    async fn clear_students(&mut self) -> Result<bool> {
        self.write("\n=== Clear All Students ===\n").await?;
        let Some(confirmation) = self
            .prompt("Are you sure you want to delete ALL students? (yes/no): ")
            .await?
        else {
            return Ok(false);
        };

        let message = if confirmation.trim().eq_ignore_ascii_case("yes") {
            match self.service.clear_students().await {
                Ok(removed) => format!("{removed} student records deleted successfully"),
                Err(e) => format!("Error clearing students: {e}"),
            }
        } else {
            "Operation cancelled.".to_string()
        };
        self.write(&format!("{message}\n")).await?;
        Ok(true)
    }
}

/// Runs the console on the process's stdin and stdout.
pub async fn run_stdio(service: &GradeService) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    Console::new(service, stdin, stdout).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    async fn run_script(service: &GradeService, script: &str) -> Result<String> {
        let mut console = Console::new(service, script.as_bytes(), Vec::new());
        console.run().await?;
        Ok(String::from_utf8_lossy(&console.into_output()).into_owned())
    }

    #[tokio::test]
    async fn test_add_and_view_student() -> Result<()> {
        init_test_tracing();
        let service = setup_test_service().await?;

        let output = run_script(&service, "1\nJane Doe\n95\n87\n93\n88\n91\n2\n5\n").await?;

        assert!(output.contains("Student ID: JD001"));
        assert!(output.contains("Total: 454"));
        assert!(output.contains("Average: 90"));
        assert!(output.contains("Grade: A"));
        assert!(output.contains("Student record inserted successfully with ID: JD001"));
        assert!(output.contains("Total Students in Database: 1"));
        assert!(output.contains("Thank you for using the system!"));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_marks_reported() -> Result<()> {
        let service = setup_test_service().await?;

        let output = run_script(&service, "1\nStudent 3\n-5\n85\n90\nabc\n92\n5\n").await?;

        assert!(output.contains("Error: Invalid marks: marks must be between 0 and 100"));
        assert_eq!(service.student_count().await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_view_empty_store() -> Result<()> {
        let service = setup_test_service().await?;
        let output = run_script(&service, "2\n5\n").await?;
        assert!(output.contains("No students found in the database."));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_found_and_missing() -> Result<()> {
        let service = setup_test_service().await?;
        service
            .process_new_student("Ann Lee", Marks([70; SUBJECT_COUNT]))
            .await?;

        let output = run_script(&service, "3\nAL001\n3\nAL001\n5\n").await?;

        assert!(output.contains("Student with ID AL001 deleted successfully"));
        assert!(output.contains("Student with ID AL001 not found"));

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() -> Result<()> {
        let service = setup_test_service().await?;
        service
            .process_new_student("Ann Lee", Marks([70; SUBJECT_COUNT]))
            .await?;

        let output = run_script(&service, "4\nno\n").await?;
        assert!(output.contains("Operation cancelled."));
        assert_eq!(service.student_count().await, 1);

        let output = run_script(&service, "4\nYES\n5\n").await?;
        assert!(output.contains("1 student records deleted successfully"));
        assert_eq!(service.student_count().await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_choice_and_end_of_input() -> Result<()> {
        let service = setup_test_service().await?;

        let output = run_script(&service, "9\nhello\n").await?;
        assert_eq!(output.matches("Invalid choice! Please enter 1-5.").count(), 2);
        assert!(!output.contains("Thank you"));

        // Input ending in the middle of an entry stores nothing
        run_script(&service, "1\nJane Doe\n50\n").await?;
        assert_eq!(service.student_count().await, 0);

        Ok(())
    }

    #[test]
    fn test_table_layout() {
        let rows = [student::Model {
            id: 1,
            student_id: "JD001".to_string(),
            name: "Jane Doe".to_string(),
            mark1: 90,
            mark2: 90,
            mark3: 90,
            mark4: 90,
            mark5: 90,
            total: 450,
            average: 90,
            grade: "A".to_string(),
            created_at: chrono::Utc::now(),
        }];
        let table = format_student_table(&rows);
        assert!(table.contains(&format!(
            "{:<12} {:<20} {:<8} {:<8} {:<6}",
            "JD001", "Jane Doe", 450, 90, "A"
        )));
        assert!(table.ends_with("Total Students in Database: 1\n"));
    }
}

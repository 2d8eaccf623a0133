//! Interactive menu shell.
//!
//! A line-oriented menu over any reader/writer pair. The shell only parses
//! user input and prints results; all document rules live in the store.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::app::{App, Persisted};
use crate::core::{DocError, Document, Stage};

const MENU_RULE_WIDTH: usize = 45;

/// Menu entries in display order.
const MENU: [&str; 11] = [
    "Add Document",
    "View All Documents",
    "Filter Documents",
    "Advance to Next Status",
    "Revert to Previous Status",
    "Edit Document",
    "Delete Document",
    "Search Documents",
    "Statistics",
    "Export Documents",
    "Exit",
];

/// Interactive session over an input and an output stream.
pub struct Shell<'a, R, W> {
    app: &'a mut App,
    input: R,
    output: W,
}

/// What the menu loop does after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    /// Create a shell driving the given application.
    pub fn new(app: &'a mut App, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    /// Run the menu loop until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "=== Document Management System ===")?;
        if let Some(fault) = self.app.load_fault() {
            writeln!(self.output, "Error loading documents: {fault}")?;
        } else if !self.app.list().is_empty() {
            writeln!(self.output, "Loaded {} documents.", self.app.list().len())?;
        }

        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Choose action (1-11): ")? else {
                break;
            };
            writeln!(self.output)?;

            if self.dispatch(&choice)? == Flow::Exit {
                break;
            }
        }

        writeln!(self.output, "Goodbye! Thank you for using Document Management System.")?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        let rule = "=".repeat(MENU_RULE_WIDTH);
        writeln!(self.output, "{rule}")?;
        for (i, entry) in MENU.iter().enumerate() {
            let label = format!("{}.", i + 1);
            writeln!(self.output, "{label:<4}{entry}")?;
        }
        writeln!(self.output, "{rule}")?;
        Ok(())
    }

    fn dispatch(&mut self, choice: &str) -> Result<Flow> {
        match choice {
            "1" => self.add()?,
            "2" => self.list()?,
            "3" => self.filter()?,
            "4" => self.change_status(true)?,
            "5" => self.change_status(false)?,
            "6" => self.edit()?,
            "7" => self.delete()?,
            "8" => self.search()?,
            "9" => self.statistics()?,
            "10" => self.export()?,
            "11" => return Ok(Flow::Exit),
            _ => writeln!(self.output, "Invalid choice. Please try again.\n")?,
        }
        Ok(Flow::Continue)
    }

    /// Print a prompt and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt, treating end of input as an empty answer.
    fn ask(&mut self, label: &str) -> Result<String> {
        Ok(self.prompt(label)?.unwrap_or_default())
    }

    fn write_documents(&mut self, docs: &[&Document]) -> Result<()> {
        let format = self.app.timestamp_format().to_string();
        for doc in docs {
            writeln!(self.output, "{}", doc.summary(&format))?;
        }
        Ok(())
    }

    /// Print "No documents yet." and return `true` when the store is empty.
    fn report_empty(&mut self) -> Result<bool> {
        if self.app.list().is_empty() {
            writeln!(self.output, "No documents yet.\n")?;
            return Ok(true);
        }
        Ok(false)
    }

    fn report_save<T>(&mut self, result: &Persisted<T>, saved: &str, unsaved: &str) -> Result<()> {
        match &result.save_error {
            None => writeln!(self.output, "{saved}")?,
            Some(err) => writeln!(self.output, "{unsaved} ({err})")?,
        }
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        writeln!(self.output, "=== Add New Document ===")?;
        let title = self.ask("Enter document title: ")?;
        if title.is_empty() {
            writeln!(self.output, "Document title cannot be empty.\n")?;
            return Ok(());
        }
        let content = self.ask("Enter document content: ")?;
        let author = self.ask("Enter author name: ")?;

        match self.app.add(&title, &content, &author) {
            Ok(result) => {
                self.report_save(
                    &result,
                    "Document successfully added.",
                    "Document added, but failed to save to file.",
                )?;
                writeln!(self.output)?;
            }
            Err(err) => self.report_error(&err)?,
        }
        Ok(())
    }

    fn list(&mut self) -> Result<()> {
        if self.report_empty()? {
            return Ok(());
        }
        writeln!(self.output, "=== Document List ===")?;
        let docs: Vec<Document> = self.app.list().to_vec();
        let refs: Vec<&Document> = docs.iter().collect();
        self.write_documents(&refs)?;
        writeln!(self.output)?;
        Ok(())
    }

    fn filter(&mut self) -> Result<()> {
        if self.report_empty()? {
            return Ok(());
        }
        writeln!(self.output, "Filter by:\n1. Status\n2. Author")?;
        let choice = self.ask("Choose option (1-2): ")?;

        match choice.as_str() {
            "1" => {
                writeln!(self.output, "Available statuses:")?;
                for stage in Stage::ALL {
                    writeln!(self.output, "{}. {}", stage.index() + 1, stage)?;
                }
                let answer = self.ask("Select status (number): ")?;
                let Ok(number) = answer.parse::<usize>() else {
                    writeln!(self.output, "Invalid input.\n")?;
                    return Ok(());
                };
                let Some(index) = number.checked_sub(1).filter(|i| *i < Stage::ALL.len()) else {
                    writeln!(self.output, "Invalid status number.\n")?;
                    return Ok(());
                };

                let docs: Vec<Document> =
                    self.app.filter_by_status(index)?.into_iter().cloned().collect();
                let stage = Stage::ALL[index];
                if docs.is_empty() {
                    writeln!(self.output, "No documents with status '{stage}' found.")?;
                } else {
                    writeln!(self.output, "\n=== Documents with status '{stage}' ===")?;
                    self.write_documents(&docs.iter().collect::<Vec<_>>())?;
                }
            }
            "2" => {
                let author = self.ask("Enter author name: ")?;
                let docs: Vec<Document> =
                    self.app.filter_by_author(&author).into_iter().cloned().collect();
                if docs.is_empty() {
                    writeln!(self.output, "No documents by author '{author}' found.")?;
                } else {
                    writeln!(self.output, "\n=== Documents by author '{author}' ===")?;
                    self.write_documents(&docs.iter().collect::<Vec<_>>())?;
                }
            }
            _ => writeln!(self.output, "Invalid choice.")?,
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Show the list and read a document id. `None` after reporting bad input.
    fn pick_document(&mut self, label: &str) -> Result<Option<u64>> {
        self.list()?;
        let answer = self.ask(label)?;
        match answer.parse::<u64>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.output, "Invalid input.\n")?;
                Ok(None)
            }
        }
    }

    fn change_status(&mut self, forward: bool) -> Result<()> {
        if self.report_empty()? {
            return Ok(());
        }
        let label = if forward {
            "Enter document ID to advance to next status: "
        } else {
            "Enter document ID to revert to previous status: "
        };
        let Some(id) = self.pick_document(label)? else {
            return Ok(());
        };

        let result = if forward { self.app.advance(id) } else { self.app.revert(id) };
        match result {
            Ok(result) if result.value => {
                let status = self.app.find(id)?.status;
                let verb = if forward { "updated" } else { "changed" };
                writeln!(self.output, "Status {verb} to: {status}")?;
                if let Some(err) = &result.save_error {
                    writeln!(self.output, "Warning: failed to save to file ({err})")?;
                }
            }
            Ok(_) if forward => writeln!(self.output, "Document is already at final status.")?,
            Ok(_) => writeln!(self.output, "Document is already at initial status.")?,
            Err(err) => self.report_error(&err)?,
        }
        writeln!(self.output)?;
        Ok(())
    }

    fn edit(&mut self) -> Result<()> {
        if self.report_empty()? {
            return Ok(());
        }
        let Some(id) = self.pick_document("Enter document ID to edit: ")? else {
            return Ok(());
        };

        let current = match self.app.find(id) {
            Ok(doc) => doc.content.clone(),
            Err(err) => {
                self.report_error(&err)?;
                writeln!(self.output)?;
                return Ok(());
            }
        };
        writeln!(self.output, "Current content:\n{current}\n")?;
        let content = self.ask("Enter new content: ")?;

        match self.app.edit(id, &content) {
            Ok(result) => self.report_save(
                &result,
                "Document content updated.",
                "Document content updated, but failed to save to file.",
            )?,
            Err(err) => self.report_error(&err)?,
        }
        writeln!(self.output)?;
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        if self.report_empty()? {
            return Ok(());
        }
        let Some(id) = self.pick_document("Enter document ID to delete: ")? else {
            return Ok(());
        };

        let title = match self.app.find(id) {
            Ok(doc) => doc.title.clone(),
            Err(err) => {
                self.report_error(&err)?;
                writeln!(self.output)?;
                return Ok(());
            }
        };
        let confirm = self
            .ask(&format!("Are you sure you want to delete document '{title}'? (yes/no): "))?
            .to_lowercase();

        if matches!(confirm.as_str(), "yes" | "y") {
            match self.app.delete(id) {
                Ok(result) => self.report_save(
                    &result,
                    "Document deleted.",
                    "Document deleted, but failed to save to file.",
                )?,
                Err(err) => self.report_error(&err)?,
            }
        } else {
            writeln!(self.output, "Deletion cancelled.")?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    fn search(&mut self) -> Result<()> {
        if self.report_empty()? {
            return Ok(());
        }
        let term = self.ask("Enter search term: ")?;

        match self.app.search(&term) {
            Ok(found) => {
                let docs: Vec<Document> = found.into_iter().cloned().collect();
                let term = term.to_lowercase();
                if docs.is_empty() {
                    writeln!(self.output, "No documents found containing '{term}'.")?;
                } else {
                    writeln!(self.output, "\n=== Search Results for '{term}' ===")?;
                    self.write_documents(&docs.iter().collect::<Vec<_>>())?;
                }
                writeln!(self.output)?;
            }
            Err(err) => self.report_error(&err)?,
        }
        Ok(())
    }

    fn statistics(&mut self) -> Result<()> {
        if self.report_empty()? {
            return Ok(());
        }
        writeln!(self.output, "=== Statistics ===")?;
        let report = self.app.statistics().render();
        writeln!(self.output, "{report}")?;
        Ok(())
    }

    fn export(&mut self) -> Result<()> {
        if self.app.list().is_empty() {
            writeln!(self.output, "No documents to export.\n")?;
            return Ok(());
        }
        let name = self.ask("Enter export filename (without extension): ")?;

        match self.app.export(Some(&name)) {
            Ok(path) => writeln!(self.output, "Documents exported to '{}'.\n", path.display())?,
            Err(err) => writeln!(self.output, "Error exporting documents: {err}\n")?,
        }
        Ok(())
    }

    fn report_error(&mut self, err: &DocError) -> Result<()> {
        match err {
            DocError::NotFound(_) => writeln!(self.output, "Document not found.")?,
            DocError::Validation(message) => writeln!(self.output, "{message}.\n")?,
            DocError::Persistence(_) => writeln!(self.output, "{err}")?,
        }
        Ok(())
    }
}

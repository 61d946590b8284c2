//! Interactive session shell
//!
//! Reads one command per line and runs it against a [`Session`]. Reported
//! errors are printed and the loop continues; a fatal error ends the shell.

use std::fs::{self, File};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use fleetdesk_app::app::{AuthService, Page, Session};
use fleetdesk_domain::model::VehicleColumn;
use fleetdesk_domain::repository::{UserRepository, VehicleRecordRepository};
use fleetdesk_domain::service::PasswordHasher;
use fleetdesk_types::{Error, OutputFormat, Result};

use crate::output::{output_merge_report, output_upload_report, output_vehicle, output_view};

const DEFAULT_EXPORT_FILE: &str = "vehicle_data.xlsx";

const HELP: &str = "\
Commands:
  login <username> <password>     Log in
  logout                          Log out and clear the session
  lookup <vehicle-number>         Show the first vehicle matching the text
  upload <file.csv>               Replace the vehicle table with a CSV file
  edit                            Open the editor (takes an undo checkpoint)
  view [filter] [--columns a,b]   Render the editable grid
  show                            Show the current grid again
  set <row> <column> <value>      Change one grid cell
  add <vehicle-number>            Add a grid row
  save                            Merge the grid into the table and save
  undo                            Revert to the last checkpoint
  export [file.xlsx]              Write the table as a spreadsheet
  back                            Return to lookup
  help                            Show this help
  quit                            Leave the shell";

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<'a, V, U, H> {
    session: Session<'a, V>,
    auth: AuthService<'a, U, H>,
    format: OutputFormat,
}

impl<'a, V, U, H> Shell<'a, V, U, H>
where
    V: VehicleRecordRepository,
    U: UserRepository,
    H: PasswordHasher,
{
    pub fn new(session: Session<'a, V>, auth: AuthService<'a, U, H>, format: OutputFormat) -> Self {
        Self {
            session,
            auth,
            format,
        }
    }

    pub fn session(&self) -> &Session<'a, V> {
        &self.session
    }

    /// Run until `quit`, end of input, or a fatal error
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "fleetdesk shell. Type 'help' for commands.")?;
        prompt(out, self.session.page())?;

        for line in input.lines() {
            let line = line?;
            let args = match shell_words::split(&line) {
                Ok(args) => args,
                Err(e) => {
                    writeln!(out, "Error: {}", e)?;
                    prompt(out, self.session.page())?;
                    continue;
                }
            };

            match self.dispatch(&args, out) {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => writeln!(out, "Error: {}", e)?,
            }
            prompt(out, self.session.page())?;
        }

        writeln!(out)?;
        Ok(())
    }

    fn dispatch<W: Write>(&mut self, args: &[String], out: &mut W) -> Result<Flow> {
        let Some((command, rest)) = args.split_first() else {
            return Ok(Flow::Continue);
        };

        match command.as_str() {
            "login" => {
                let [username, password] = rest else {
                    return Err(usage("login <username> <password>"));
                };
                self.session.login(&self.auth, username, password)?;
                writeln!(out, "Login successful!")?;
            }
            "logout" => {
                self.session.logout();
                writeln!(out, "Logged out successfully!")?;
            }
            "lookup" => {
                let query = rest.join(" ");
                let vehicle = self.session.lookup(&query)?;
                output_vehicle(out, self.format, &vehicle)?;
            }
            "upload" => {
                let [path] = rest else {
                    return Err(usage("upload <file.csv>"));
                };
                let mut file = File::open(path)?;
                let report = self.session.upload(&mut file)?;
                output_upload_report(out, self.format, &report)?;
            }
            "edit" => {
                self.session.begin_edit()?;
                writeln!(
                    out,
                    "Editing {} vehicle records. Use 'view' to show the grid.",
                    self.session.table().len()
                )?;
            }
            "view" => {
                let (filter, columns) = parse_view_args(rest)?;
                let view = self.session.render_view(&filter, columns)?;
                output_view(out, self.format, view)?;
            }
            "show" => match self.session.view() {
                Some(view) => output_view(out, self.format, view)?,
                None => return Err(Error::InvalidInput("No grid rendered yet.".to_string())),
            },
            "set" => {
                let [row, column, value] = rest else {
                    return Err(usage("set <row> <column> <value>"));
                };
                let row: usize = row
                    .parse()
                    .map_err(|_| Error::InvalidInput(format!("'{}' is not a row number", row)))?;
                let column: VehicleColumn = column.parse()?;
                self.session.set_cell(row, column, value)?;
            }
            "add" => {
                let [vehicle_number] = rest else {
                    return Err(usage("add <vehicle-number>"));
                };
                let row = self.session.add_row(vehicle_number)?;
                writeln!(out, "Added row {}.", row)?;
            }
            "save" => {
                let report = self.session.save()?;
                output_merge_report(out, self.format, &report)?;
            }
            "undo" => {
                self.session.undo()?;
                writeln!(out, "Reverted to last saved version.")?;
            }
            "export" => {
                let path = rest
                    .first()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));
                let buffer = self.session.export()?;
                fs::write(&path, &buffer)?;
                writeln!(out, "Exported {} rows to {}", self.session.table().len(), path.display())?;
            }
            "back" => {
                self.session.back_to_lookup()?;
            }
            "help" => writeln!(out, "{}", HELP)?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => {
                return Err(Error::InvalidInput(format!(
                    "unknown command '{}'; type 'help'",
                    other
                )))
            }
        }

        Ok(Flow::Continue)
    }
}

fn prompt<W: Write>(out: &mut W, page: Page) -> Result<()> {
    let label = match page {
        Page::Login => "login",
        Page::Lookup => "lookup",
        Page::Edit => "edit",
    };
    write!(out, "fleetdesk:{}> ", label)?;
    out.flush()?;
    Ok(())
}

fn usage(text: &str) -> Error {
    Error::InvalidInput(format!("usage: {}", text))
}

/// `[filter] [--columns a,b]` in either order
fn parse_view_args(args: &[String]) -> Result<(String, Option<Vec<VehicleColumn>>)> {
    let mut filter = String::new();
    let mut columns = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--columns" || arg == "-c" {
            let list = iter
                .next()
                .ok_or_else(|| usage("view [filter] [--columns a,b]"))?;
            columns = Some(VehicleColumn::parse_list(list)?);
        } else if filter.is_empty() {
            filter = arg.clone();
        } else {
            return Err(usage("view [filter] [--columns a,b]"));
        }
    }

    Ok((filter, columns))
}

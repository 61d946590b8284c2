//! Per-operator session state
//!
//! Everything the operator's actions read or mutate between requests lives
//! here: the logged-in user, the current page, the cached table, the grid
//! being edited and the single undo checkpoint. Reads go through `reload`,
//! writes through `save`; nothing else touches the backing file.

use std::io::Read;

use serde::Serialize;

use fleetdesk_domain::model::{
    MergeReport, Snapshot, UploadReport, VehicleColumn, VehicleRecord, VehicleTable, VehicleView,
};
use fleetdesk_domain::repository::{UserRepository, VehicleRecordRepository};
use fleetdesk_domain::service::PasswordHasher;
use fleetdesk_infra::excel::export_to_buffer;
use fleetdesk_types::{Error, Result};

use super::auth_service::AuthService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Login,
    Lookup,
    Edit,
}

/// Filter and column choice the grid was rendered with
#[derive(Debug, Clone)]
struct ViewSpec {
    filter: String,
    columns: Vec<VehicleColumn>,
}

pub struct Session<'a, V> {
    store: &'a V,
    page: Page,
    user: Option<String>,
    table: VehicleTable,
    view_spec: Option<ViewSpec>,
    view: Option<VehicleView>,
    checkpoint: Option<Snapshot>,
}

impl<'a, V: VehicleRecordRepository> Session<'a, V> {
    pub fn new(store: &'a V) -> Self {
        Self {
            store,
            page: Page::Login,
            user: None,
            table: VehicleTable::default(),
            view_spec: None,
            view: None,
            checkpoint: None,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn table(&self) -> &VehicleTable {
        &self.table
    }

    pub fn view(&self) -> Option<&VehicleView> {
        self.view.as_ref()
    }

    pub fn checkpoint(&self) -> Option<&Snapshot> {
        self.checkpoint.as_ref()
    }

    pub fn login<U, H>(&mut self, auth: &AuthService<'_, U, H>, username: &str, password: &str) -> Result<()>
    where
        U: UserRepository,
        H: PasswordHasher,
    {
        let user = auth.login(username, password)?;
        self.table = self.store.reload()?;
        self.user = Some(user.username);
        self.page = Page::Lookup;
        Ok(())
    }

    /// Drop all session state and return to the login page
    pub fn logout(&mut self) {
        let store = self.store;
        *self = Self::new(store);
    }

    /// First vehicle whose number contains `query`, ignoring case
    pub fn lookup(&mut self, query: &str) -> Result<VehicleRecord> {
        self.require_user()?;
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("Please enter a vehicle number.".to_string()));
        }

        self.table = self.store.reload()?;
        let found = self
            .table
            .find_first(query)
            .cloned()
            .ok_or_else(|| Error::Mismatch("No matching vehicle number found.".to_string()))?;
        tracing::debug!(%query, vehicle = %found.vehicle_number, "lookup hit");
        Ok(found)
    }

    /// Replace the stored table with an uploaded CSV
    pub fn upload(&mut self, reader: &mut dyn Read) -> Result<UploadReport> {
        self.require_user()?;
        let (table, report) = self.store.replace_from_reader(reader)?;
        self.table = table;
        if self.view_spec.is_some() {
            self.project_current();
        }
        Ok(report)
    }

    /// Open the editor: reload and take a fresh checkpoint
    pub fn begin_edit(&mut self) -> Result<()> {
        self.require_user()?;
        self.table = self.store.reload()?;
        self.checkpoint = Some(self.table.snapshot());
        self.view_spec = None;
        self.view = None;
        self.page = Page::Edit;
        Ok(())
    }

    pub fn back_to_lookup(&mut self) -> Result<()> {
        self.require_user()?;
        self.view_spec = None;
        self.view = None;
        self.page = Page::Lookup;
        Ok(())
    }

    /// Reload, filter on vehicle number and project; the result becomes the grid
    pub fn render_view(&mut self, filter: &str, columns: Option<Vec<VehicleColumn>>) -> Result<&VehicleView> {
        self.require_editor()?;
        self.table = self.store.reload()?;
        self.view_spec = Some(ViewSpec {
            filter: filter.to_string(),
            columns: columns.unwrap_or_else(|| VehicleColumn::ALL.to_vec()),
        });
        self.project_current();
        self.view().ok_or_else(|| Error::InvalidInput("no grid rendered".to_string()))
    }

    pub fn set_cell(&mut self, row: usize, column: VehicleColumn, value: &str) -> Result<()> {
        self.view_mut()?.set_cell(row, column, value)
    }

    pub fn add_row(&mut self, vehicle_number: &str) -> Result<usize> {
        self.view_mut()?.add_row(vehicle_number)
    }

    /// Merge the grid into the current file contents and persist
    ///
    /// The checkpoint moves to the saved table.
    pub fn save(&mut self) -> Result<MergeReport> {
        self.require_editor()?;
        let mut table = self.store.reload()?;
        let report = match self.view {
            Some(ref view) => table.merge_edits(view),
            None => MergeReport::default(),
        };
        self.store.save(&table)?;

        self.checkpoint = Some(table.snapshot());
        self.table = table;
        if self.view_spec.is_some() {
            self.project_current();
        }
        Ok(report)
    }

    /// Roll the table back to the checkpoint and persist it
    ///
    /// Unsaved grid edits are discarded.
    pub fn undo(&mut self) -> Result<()> {
        self.require_editor()?;
        let checkpoint = self
            .checkpoint
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("Nothing to undo.".to_string()))?;
        self.table.restore(checkpoint);
        self.store.save(&self.table)?;
        if self.view_spec.is_some() {
            self.project_current();
        }
        Ok(())
    }

    /// Current table as an `.xlsx` buffer
    pub fn export(&self) -> Result<Vec<u8>> {
        self.require_user()?;
        export_to_buffer(&self.table)
    }

    fn project_current(&mut self) {
        self.view = self.view_spec.as_ref().map(|spec| {
            self.table
                .filter(&spec.filter, VehicleColumn::VehicleNumber)
                .project(&spec.columns)
        });
    }

    fn view_mut(&mut self) -> Result<&mut VehicleView> {
        self.require_editor()?;
        self.view
            .as_mut()
            .ok_or_else(|| Error::InvalidInput("Render the grid with 'view' first.".to_string()))
    }

    fn require_user(&self) -> Result<&str> {
        self.user.as_deref().ok_or(Error::NotLoggedIn)
    }

    fn require_editor(&self) -> Result<()> {
        self.require_user()?;
        if self.page != Page::Edit {
            return Err(Error::InvalidInput("Open the editor with 'edit' first.".to_string()));
        }
        Ok(())
    }
}

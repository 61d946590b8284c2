//! File-based user directory

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use fleetdesk_domain::model::UserRecord;
use fleetdesk_domain::repository::UserRepository;
use fleetdesk_types::{Error, Result};

const HEADER: [&str; 4] = ["username", "name", "email", "password"];

/// User directory stored as `username,name,email,password` CSV
///
/// Other processes register users and reset passwords on the same file, so
/// every lookup and mutation re-reads it first. Mutations rewrite it in full.
pub struct FileUserDirectory {
    csv_path: PathBuf,
    users: RefCell<Vec<UserRecord>>,
}

impl FileUserDirectory {
    /// Load the directory, creating an empty file if there is none yet
    pub fn open(csv_path: PathBuf) -> Result<Self> {
        let directory = Self {
            users: RefCell::new(read_users(&csv_path)?),
            csv_path,
        };
        if !directory.csv_path.exists() {
            directory.persist()?;
        }
        Ok(directory)
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn count(&self) -> Result<usize> {
        self.refresh()?;
        Ok(self.users.borrow().len())
    }

    fn refresh(&self) -> Result<()> {
        *self.users.borrow_mut() = read_users(&self.csv_path)?;
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.csv_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.csv_path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        writer.write_record(HEADER)?;
        for user in self.users.borrow().iter() {
            writer.serialize(user)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn read_users(csv_path: &Path) -> Result<Vec<UserRecord>> {
    if !csv_path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(csv_path)?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let users = reader
        .deserialize::<UserRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(users)
}

impl UserRepository for FileUserDirectory {
    fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        self.refresh()?;
        Ok(self
            .users
            .borrow()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.refresh()?;
        Ok(self
            .users
            .borrow()
            .iter()
            .find(|u| u.has_email(email))
            .cloned())
    }

    fn insert(&self, record: UserRecord) -> Result<()> {
        if self.find_by_username(&record.username)?.is_some() {
            return Err(Error::DuplicateKey {
                field: "username",
                value: record.username,
            });
        }
        if self.find_by_email(&record.email)?.is_some() {
            return Err(Error::DuplicateKey {
                field: "email",
                value: record.email,
            });
        }

        let username = record.username.clone();
        self.users.borrow_mut().push(record);
        if let Err(e) = self.persist() {
            self.users.borrow_mut().pop();
            return Err(e);
        }
        tracing::info!(%username, "registered user");
        Ok(())
    }

    fn update_password(&self, username: &str, new_hash: &str) -> Result<()> {
        self.refresh()?;
        let mut users = self.users.borrow_mut();
        let user = users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| Error::Mismatch(format!("No user named '{}'", username)))?;
        let previous = std::mem::replace(&mut user.password_hash, new_hash.to_string());
        drop(users);

        if let Err(e) = self.persist() {
            if let Some(user) = self
                .users
                .borrow_mut()
                .iter_mut()
                .find(|u| u.username == username)
            {
                user.password_hash = previous;
            }
            return Err(e);
        }
        tracing::info!(%username, "password updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn alice() -> UserRecord {
        UserRecord::new("alice", "Alice A", "alice@example.com", "hash-a")
    }

    #[test]
    fn test_open_creates_header_only_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");

        let directory = FileUserDirectory::open(path.clone()).unwrap();

        assert_eq!(directory.count().unwrap(), 0);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "username,name,email,password\n"
        );
    }

    #[test]
    fn test_insert_then_find_by_either_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");
        let directory = FileUserDirectory::open(path.clone()).unwrap();

        directory.insert(alice()).unwrap();

        assert_eq!(directory.find_by_username("alice").unwrap(), Some(alice()));
        assert_eq!(
            directory.find_by_email("ALICE@example.com").unwrap(),
            Some(alice())
        );

        // Survives a reopen
        let reopened = FileUserDirectory::open(path).unwrap();
        assert_eq!(reopened.find_by_username("alice").unwrap(), Some(alice()));
    }

    #[test]
    fn test_duplicate_username_or_email_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");
        let directory = FileUserDirectory::open(path.clone()).unwrap();
        directory.insert(alice()).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let same_name = UserRecord::new("alice", "Other", "other@example.com", "h");
        let err = directory.insert(same_name).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { field: "username", .. }));

        let same_email = UserRecord::new("bob", "Bob", "alice@example.com", "h");
        let err = directory.insert(same_email).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { field: "email", .. }));

        assert_eq!(directory.count().unwrap(), 1);
        assert!(directory.find_by_username("bob").unwrap().is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_update_password_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");
        let directory = FileUserDirectory::open(path.clone()).unwrap();
        directory.insert(alice()).unwrap();

        directory.update_password("alice", "hash-b").unwrap();

        let reopened = FileUserDirectory::open(path).unwrap();
        let user = reopened.find_by_username("alice").unwrap().unwrap();
        assert_eq!(user.password_hash, "hash-b");
    }

    #[test]
    fn test_update_password_unknown_user() {
        let dir = tempdir().unwrap();
        let directory = FileUserDirectory::open(dir.path().join("users.csv")).unwrap();
        assert!(matches!(
            directory.update_password("ghost", "h"),
            Err(Error::Mismatch(_))
        ));
    }

    #[test]
    fn test_handles_see_each_others_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");
        let first = FileUserDirectory::open(path.clone()).unwrap();
        first.insert(alice()).unwrap();

        // A long-lived handle, opened before the other writes happen
        let long_lived = FileUserDirectory::open(path.clone()).unwrap();
        let other = FileUserDirectory::open(path.clone()).unwrap();
        other.update_password("alice", "hash-b").unwrap();
        other
            .insert(UserRecord::new("bob", "Bob B", "bob@example.com", "hash-bob"))
            .unwrap();

        let seen = long_lived.find_by_username("alice").unwrap().unwrap();
        assert_eq!(seen.password_hash, "hash-b");
        assert!(long_lived.find_by_email("bob@example.com").unwrap().is_some());

        long_lived.update_password("alice", "hash-c").unwrap();

        let on_disk = FileUserDirectory::open(path).unwrap();
        assert_eq!(on_disk.count().unwrap(), 2);
        assert!(on_disk.find_by_username("bob").unwrap().is_some());
        assert_eq!(
            on_disk.find_by_username("alice").unwrap().unwrap().password_hash,
            "hash-c"
        );
    }
}

use crate::transport::{Transport, TransportError};
use bytes::{Bytes, BytesMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// An append-only file receiving a copy of every request before it is sent.
///
/// One log is shared by all peers of a dispatcher. Each audit write holds the file
/// for its whole duration, so concurrent requests never interleave in the log.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: Arc<PathBuf>,
    file: Arc<Mutex<File>>,
}

impl AuditLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<AuditLog> {
        let path = path.as_ref().to_path_buf();
        let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(AuditLog {
            path: Arc::new(path),
            file: Arc::new(Mutex::new(File::from_std(file))),
        })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Take the log for one write.
    pub async fn transport(&self) -> AuditTransport {
        let file = self.file.clone().lock_owned().await;
        AuditTransport {
            file,
            write_buf: BytesMut::new(),
        }
    }
}

/// Write-only transport over an [`AuditLog`]. Reading fails with [`TransportError::WriteOnly`].
pub struct AuditTransport {
    file: OwnedMutexGuard<File>,
    write_buf: BytesMut,
}

impl Transport for AuditTransport {
    fn write(&mut self, buf: &[u8]) {
        self.write_buf.extend_from_slice(buf);
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        if !self.write_buf.is_empty() {
            let pending = self.write_buf.split().freeze();
            self.file.write_all(&pending).await?;
        }
        self.file.flush().await?;
        Ok(())
    }

    async fn read_exact(&mut self, _len: usize) -> Result<Bytes, TransportError> {
        Err(TransportError::WriteOnly)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.flush().await
    }
}

#[cfg(test)]
mod tests {
    use crate::transport::{AuditLog, Transport, TransportError};

    #[tokio::test]
    async fn test_append_and_write_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let audit_log = AuditLog::open(&path).unwrap();
        assert_eq!(path.as_path(), audit_log.path());

        let mut transport = audit_log.transport().await;
        transport.write(b"first\n");
        transport.flush().await.unwrap();
        assert!(matches!(transport.read_exact(1).await, Err(TransportError::WriteOnly)));
        transport.close().await.unwrap();
        drop(transport);

        let mut transport = audit_log.transport().await;
        transport.write(b"second\n");
        // close flushes what is still buffered
        transport.close().await.unwrap();
        drop(transport);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!("first\nsecond\n", content);
    }

    #[tokio::test]
    async fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        std::fs::write(&path, b"old\n").unwrap();

        let audit_log = AuditLog::open(&path).unwrap();
        let mut transport = audit_log.transport().await;
        transport.write(b"new\n");
        transport.close().await.unwrap();
        drop(transport);

        assert_eq!("old\nnew\n", std::fs::read_to_string(&path).unwrap());
    }
}

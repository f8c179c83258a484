/* # File contract test suite

Exercises the full file state machine and the one-shot helpers against the
real filesystem through tempdir fixtures. Organized by contract area:
lifecycle, transfer, positioning, buffering, and the global environment
operations.
*/

#[cfg(test)]
mod file_contract_tests {
    use tempfile::TempDir;

    use crate::error::ErrorKind;
    use crate::fs::{BufferMode, NativeFile, OpenMode, ReadAmount, ops};

    fn setup() -> TempDir {
        TempDir::new().expect("failed to create temp dir")
    }

    fn path_in(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_write_flush_reopen_round_trip() {
        let dir = setup();
        let path = path_in(&dir, "a.tmp");

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Write).unwrap();
        assert_eq!(file.write(b"hello").unwrap(), 5);
        file.flush().unwrap();
        file.close().unwrap();

        file.open(OpenMode::Read).unwrap();
        let (bytes, count) = file.read(ReadAmount::All).unwrap();
        assert_eq!((bytes.as_slice(), count), (b"hello".as_slice(), 5));
        file.close().unwrap();
    }

    #[test]
    fn test_read_as_text() {
        let dir = setup();
        let path = path_in(&dir, "text.txt");
        ops::write(&path, b"hello").unwrap();

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Read).unwrap();
        let (text, count) = file.read_to_string(ReadAmount::All).unwrap();
        assert_eq!((text.as_str(), count), ("hello", 5));
        file.close().unwrap();
    }

    #[test]
    fn test_read_exact_then_rest() {
        let dir = setup();
        let path = path_in(&dir, "split.txt");
        ops::write(&path, b"hello").unwrap();

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Read).unwrap();
        let (head, n) = file.read(ReadAmount::Exact(2)).unwrap();
        assert_eq!((head.as_slice(), n), (b"he".as_slice(), 2));
        assert_eq!(file.tell(), 2);
        let (rest, n) = file.read(ReadAmount::All).unwrap();
        assert_eq!((rest.as_slice(), n), (b"llo".as_slice(), 3));
        file.close().unwrap();
    }

    #[test]
    fn test_read_at_end_is_empty_not_an_error() {
        let dir = setup();
        let path = path_in(&dir, "drained.txt");
        ops::write(&path, b"abc").unwrap();

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Read).unwrap();
        file.read(ReadAmount::All).unwrap();
        let (bytes, count) = file.read(ReadAmount::All).unwrap();
        assert!(bytes.is_empty());
        assert_eq!(count, 0);
        let (bytes, count) = file.read(ReadAmount::Exact(16)).unwrap();
        assert!(bytes.is_empty());
        assert_eq!(count, 0);
        file.close().unwrap();
    }

    #[test]
    fn test_read_request_clamped_to_available() {
        let dir = setup();
        let path = path_in(&dir, "short.txt");
        ops::write(&path, b"abc").unwrap();

        let (bytes, count) = ops::read(&path, ReadAmount::Exact(1000)).unwrap();
        assert_eq!((bytes.as_slice(), count), (b"abc".as_slice(), 3));
    }

    #[test]
    fn test_open_while_open_fails_without_side_effects() {
        let dir = setup();
        let path = path_in(&dir, "twice.txt");
        ops::write(&path, b"hello").unwrap();

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Read).unwrap();
        let err = file.open(OpenMode::Write).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::AlreadyOpen { .. }));

        // The live handle is untouched and still readable.
        assert_eq!(file.mode(), OpenMode::Read);
        let (bytes, _) = file.read(ReadAmount::All).unwrap();
        assert_eq!(bytes, b"hello");
        file.close().unwrap();
    }

    #[test]
    fn test_repeated_close_is_a_reported_error() {
        let dir = setup();
        let path = path_in(&dir, "once.txt");
        ops::write(&path, b"x").unwrap();

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Read).unwrap();
        file.close().unwrap();
        let err = file.close().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotOpen { .. }));
    }

    #[test]
    fn test_read_requires_read_mode() {
        let dir = setup();
        let path = path_in(&dir, "wrongmode.txt");

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Write).unwrap();
        let err = file.read(ReadAmount::All).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotOpenForRead { .. }));
        file.close().unwrap();
    }

    #[test]
    fn test_write_requires_write_or_append_mode() {
        let dir = setup();
        let path = path_in(&dir, "readonly.txt");
        ops::write(&path, b"x").unwrap();

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Read).unwrap();
        let err = file.write(b"nope").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotOpenForWrite { .. }));
        file.close().unwrap();

        let err = file.write(b"nope").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotOpenForWrite { .. }));
    }

    #[test]
    fn test_open_missing_file_reports_open_failed() {
        let dir = setup();
        let path = path_in(&dir, "missing.txt");

        let mut file = NativeFile::new(&path);
        let err = file.open(OpenMode::Read).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::OpenFailed { .. }));
        assert_eq!(file.mode(), OpenMode::Closed);
    }

    #[test]
    fn test_seek_then_tell() {
        let dir = setup();
        let path = path_in(&dir, "seek.txt");
        ops::write(&path, b"abcdef").unwrap();

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Read).unwrap();
        for position in [0u64, 3, 6] {
            file.seek(position).unwrap();
            assert_eq!(file.tell(), position as i64);
        }
        file.seek(4).unwrap();
        let (bytes, _) = file.read(ReadAmount::All).unwrap();
        assert_eq!(bytes, b"ef");
        file.close().unwrap();
    }

    #[test]
    fn test_seek_past_end_then_write_extends() {
        let dir = setup();
        let path = path_in(&dir, "sparse.bin");

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Write).unwrap();
        file.write(b"abc").unwrap();
        file.seek(5).unwrap();
        file.write(b"xy").unwrap();
        file.close().unwrap();

        let (bytes, count) = ops::read(&path, ReadAmount::All).unwrap();
        assert_eq!(count, 7);
        assert_eq!(bytes, b"abc\0\0xy");
    }

    #[test]
    fn test_size_on_closed_file_leaves_it_closed() {
        let dir = setup();
        let path = path_in(&dir, "sized.txt");
        ops::write(&path, b"hello").unwrap();

        let mut file = NativeFile::new(&path);
        assert_eq!(file.size(), 5);
        assert_eq!(file.mode(), OpenMode::Closed);
        assert_eq!(file.tell(), -1);
    }

    #[test]
    fn test_size_while_open_restores_position() {
        let dir = setup();
        let path = path_in(&dir, "positioned.txt");
        ops::write(&path, b"abcdef").unwrap();

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Read).unwrap();
        file.seek(3).unwrap();
        assert_eq!(file.size(), 6);
        assert_eq!(file.tell(), 3);
        file.close().unwrap();
    }

    #[test]
    fn test_size_while_open_for_write() {
        let dir = setup();
        let path = path_in(&dir, "growing.txt");

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Write).unwrap();
        file.write(b"hello").unwrap();
        assert_eq!(file.size(), 5);
        file.close().unwrap();
    }

    #[test]
    fn test_buffer_configuration_survives_reopen() {
        let dir = setup();
        let path = path_in(&dir, "buffered.txt");
        ops::write(&path, b"content").unwrap();

        let mut file = NativeFile::new(&path);
        file.set_buffer(BufferMode::Full, 1024).unwrap();

        file.open(OpenMode::Read).unwrap();
        assert_eq!(file.buffer(), (BufferMode::Full, 1024));
        file.close().unwrap();

        file.open(OpenMode::Read).unwrap();
        assert_eq!(file.buffer(), (BufferMode::Full, 1024));
        let (bytes, _) = file.read(ReadAmount::All).unwrap();
        assert_eq!(bytes, b"content");
        file.close().unwrap();
    }

    #[test]
    fn test_set_buffer_on_live_handle() {
        let dir = setup();
        let path = path_in(&dir, "live.txt");

        let mut file = NativeFile::new(&path);
        file.open(OpenMode::Write).unwrap();
        file.set_buffer(BufferMode::None, 0).unwrap();
        file.write(b"unbuffered").unwrap();
        file.close().unwrap();

        assert_eq!(ops::read_to_string(&path).unwrap(), "unbuffered");
    }

    #[test]
    fn test_drop_closes_open_handle() {
        let dir = setup();
        let path = path_in(&dir, "dropped.txt");

        {
            let mut file = NativeFile::new(&path);
            file.open(OpenMode::Write).unwrap();
            file.write(b"persisted").unwrap();
            // No explicit close; Drop releases the handle.
        }

        assert_eq!(ops::read_to_string(&path).unwrap(), "persisted");
    }

    #[test]
    fn test_facade_write_then_append() {
        let dir = setup();
        let path = path_in(&dir, "log.txt");

        ops::write(&path, b"hello").unwrap();
        ops::append(&path, b" world").unwrap();
        assert_eq!(ops::read_to_string(&path).unwrap(), "hello world");

        // write truncates
        ops::write(&path, b"fresh").unwrap();
        assert_eq!(ops::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn test_facade_read_missing_file_fails() {
        let dir = setup();
        let path = path_in(&dir, "absent.txt");

        let err = ops::read(&path, ReadAmount::All).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::OpenFailed { .. }));
    }

    #[test]
    fn test_remove() {
        let dir = setup();
        let path = path_in(&dir, "doomed.txt");
        ops::write(&path, b"x").unwrap();

        ops::remove(&path).unwrap();
        let err = ops::read(&path, ReadAmount::All).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::OpenFailed { .. }));
    }

    #[test]
    fn test_remove_missing_file_fails() {
        let dir = setup();
        let path = path_in(&dir, "ghost.txt");

        let err = ops::remove(&path).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::RemoveFailed { .. }));
    }

    #[test]
    fn test_working_directory_round_trip() {
        let cwd = ops::working_directory().unwrap();
        assert!(!cwd.is_empty());
        // Re-entering the current directory is a harmless no-op.
        ops::set_working_directory(&cwd).unwrap();
        assert_eq!(ops::working_directory().unwrap(), cwd);
    }

    #[test]
    fn test_set_working_directory_to_missing_path_fails() {
        let dir = setup();
        let path = path_in(&dir, "no-such-dir");

        let err = ops::set_working_directory(&path).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ChdirFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_single_root_volume_list() {
        assert_eq!(ops::volume_list().unwrap(), vec!["/".to_string()]);
    }

    #[test]
    fn test_directory_and_metadata_hooks_are_inert() {
        assert!(ops::directory_items("anywhere").unwrap().is_empty());
        assert!(ops::info("anywhere").unwrap().is_none());
        assert!(ops::create_directory("anywhere").is_err());
        assert!(!ops::mount("anywhere"));
        assert!(!ops::unmount("anywhere"));
    }
}

#![allow(dead_code)]

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Creates a temporary manifest with a unique name
    pub fn create_temp_manifest(content: &str, ext: &str) -> PathBuf {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();

        let path = std::env::temp_dir().join(format!(
            "routeway_test_{}_{}_{}.{}",
            std::process::id(),
            counter,
            nanos,
            ext
        ));

        std::fs::write(&path, content).unwrap();
        path
    }

    /// Cleanup temporary files (best effort)
    pub fn cleanup_temp_files(paths: &[PathBuf]) {
        for path in paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

pub mod fixtures {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use routeway::router::{Element, RouteDefinition};

    /// Counts calls to a loader or hook shared with a test
    #[derive(Clone, Default)]
    pub struct Counter(Rc<Cell<usize>>);

    impl Counter {
        pub fn bump(&self) {
            self.0.set(self.0.get() + 1);
        }

        pub fn get(&self) -> usize {
            self.0.get()
        }
    }

    /// Ordered event log shared with closures
    #[derive(Clone, Default)]
    pub struct Events(Rc<RefCell<Vec<String>>>);

    impl Events {
        pub fn push(&self, event: impl Into<String>) {
            self.0.borrow_mut().push(event.into());
        }

        pub fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.borrow_mut())
        }
    }

    /// Leaf rendering its name
    pub fn named(path: &str, name: &str) -> RouteDefinition {
        RouteDefinition::new(path)
            .name(name)
            .element(Element::new(name.to_string()))
    }

    pub fn rendered(element: Option<Element>) -> Option<String> {
        element.and_then(|e| e.downcast_ref::<String>().cloned())
    }
}

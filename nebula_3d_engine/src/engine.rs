//! Nebula3D Engine - Singleton manager for engine subsystems
//!
//! This module provides global singleton management for graphics devices and
//! the logging facility. It uses thread-safe static storage with RwLock for
//! safe concurrent access.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;
use crate::graphics_device::GraphicsDevice;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use rustc_hash::FxHashMap;

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Named graphics devices (each wrapped in Mutex for thread-safe mutable access)
    graphics_devices: RwLock<FxHashMap<String, Arc<Mutex<dyn GraphicsDevice>>>>,
}

impl EngineState {
    /// Create a new empty engine state
    fn new() -> Self {
        Self {
            graphics_devices: RwLock::new(FxHashMap::default()),
        }
    }
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// Manages the lifecycle of all engine subsystems (graphics devices, logger)
/// using a singleton pattern with thread-safe access.
///
/// # Example
///
/// ```no_run
/// use nebula_3d_engine::nebula3d::Engine;
///
/// // Initialize engine
/// Engine::initialize()?;
///
/// // Register a graphics device under a name
/// // Engine::create_graphics_device("main", VulkanGraphicsDevice::new(config)?)?;
///
/// // Access it globally
/// // let device = Engine::graphics_device("main")?;
///
/// // Cleanup
/// Engine::shutdown();
/// # Ok::<(), nebula_3d_engine::nebula3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Helper to log errors before returning them (internal use)
    ///
    /// This ensures all Engine errors are automatically logged with proper severity
    /// and source information, enabling better debugging and monitoring.
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("nebula3d::Engine", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::engine_error!("nebula3d::Engine", "Backend error: {}", msg);
            }
            _ => {
                crate::engine_error!("nebula3d::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    /// Initialize the engine
    ///
    /// This must be called once at application startup before creating any subsystems.
    ///
    /// # Errors
    ///
    /// Currently always succeeds, but returns Result for future extensibility.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(|| EngineState::new());
        Ok(())
    }

    /// Shutdown the entire engine and destroy all singletons
    ///
    /// This should be called at application shutdown to properly cleanup all
    /// subsystems. After calling this, you must call `initialize()` again before
    /// creating new subsystems.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut devices) = state.graphics_devices.write() {
                devices.clear();
            }
        }
    }

    /// Create and register a named graphics device
    ///
    /// This is a simplified API that automatically wraps the device in Arc,
    /// registers it under the given name, and returns the shared handle.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique name for the device (e.g., "main")
    /// * `device` - Any type implementing the GraphicsDevice trait
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - A device with this name already exists
    /// - The device registry lock is poisoned
    pub fn create_graphics_device<D: GraphicsDevice + 'static>(
        name: &str,
        device: D,
    ) -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        // Wrap in Arc<Mutex<dyn GraphicsDevice>>
        let arc_device: Arc<Mutex<dyn GraphicsDevice>> = Arc::new(Mutex::new(device));

        // Register under the given name
        Self::register_graphics_device(name, arc_device.clone())?;

        // Log successful creation
        crate::engine_info!("nebula3d::Engine", "Graphics device '{}' created successfully", name);

        Ok(arc_device)
    }

    /// Register a graphics device under a name (internal use)
    ///
    /// This is called internally by create_graphics_device(). Marked pub(crate)
    /// to allow access from other modules if needed.
    pub(crate) fn register_graphics_device(
        name: &str,
        device: Arc<Mutex<dyn GraphicsDevice>>,
    ) -> Result<()> {
        let state = ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))?;

        let mut lock = state.graphics_devices.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Graphics device registry lock poisoned".to_string())
            ))?;

        if lock.contains_key(name) {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed(format!(
                    "Graphics device '{}' already exists. Call Engine::destroy_graphics_device() first.",
                    name
                ))
            ));
        }

        lock.insert(name.to_string(), device);
        Ok(())
    }

    /// Get a graphics device by name
    ///
    /// This provides global access to a device after it has been created.
    ///
    /// # Returns
    ///
    /// A shared pointer to the device wrapped in a Mutex for thread-safe access
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - No device with this name has been created
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nebula_3d_engine::nebula3d::Engine;
    ///
    /// let device = Engine::graphics_device("main")?;
    /// let device_guard = device.lock().unwrap();
    /// // Use device_guard...
    /// # Ok::<(), nebula_3d_engine::nebula3d::Error>(())
    /// ```
    pub fn graphics_device(name: &str) -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        let state = ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))?;

        let lock = state.graphics_devices.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Graphics device registry lock poisoned".to_string())
            ))?;

        lock.get(name).cloned()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed(format!(
                    "Graphics device '{}' not found. Call Engine::create_graphics_device() first.",
                    name
                ))
            ))
    }

    /// Destroy a graphics device by name
    ///
    /// Removes the device from the registry, allowing a new one to be created
    /// under the same name. Destroying a name that does not exist is a no-op.
    /// All existing device references remain valid until dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized
    pub fn destroy_graphics_device(name: &str) -> Result<()> {
        let state = ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized".to_string())
            ))?;

        let mut lock = state.graphics_devices.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Graphics device registry lock poisoned".to_string())
            ))?;

        if lock.remove(name).is_some() {
            crate::engine_info!("nebula3d::Engine", "Graphics device '{}' destroyed", name);
        }

        Ok(())
    }

    /// Get the number of registered graphics devices
    ///
    /// Returns 0 when the engine is not initialized.
    pub fn graphics_device_count() -> usize {
        ENGINE_STATE.get()
            .and_then(|state| state.graphics_devices.read().ok())
            .map(|lock| lock.len())
            .unwrap_or(0)
    }

    /// Get the names of all registered graphics devices
    ///
    /// The returned order is unspecified. Returns an empty list when the
    /// engine is not initialized.
    pub fn graphics_device_names() -> Vec<String> {
        ENGINE_STATE.get()
            .and_then(|state| state.graphics_devices.read().ok())
            .map(|lock| lock.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut devices) = state.graphics_devices.write() {
                devices.clear();
            }
        }
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (file logger,
    /// network logger, etc.)
    ///
    /// # Arguments
    ///
    /// * `logger` - Any type implementing the Logger trait
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nebula_3d_engine::nebula3d::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level
    /// * `source` - Source module (e.g., "nebula3d::Engine")
    /// * `message` - Log message
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! macro to include source location.
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level (typically Error)
    /// * `source` - Source module (e.g., "nebula3d::Engine")
    /// * `message` - Log message
    /// * `file` - Source file path
    /// * `line` - Source line number
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

//! Process-wide override of `HTMLCanvasElement.prototype.getContext`.
//!
//! Once applied, every `getContext` call on any canvas gets the HDR context
//! options merged over its own. There is a single patch layer: applying twice
//! keeps the first patch, resetting without a patch does nothing. Apply and
//! reset are not reentrant and must only be called from the main thread.

use std::cell::RefCell;

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use super::canvas::ContextOptions;
use crate::error::{HdrCanvasError, Result};
use crate::interop::get_property;

/// Holds at most one installed patch.
#[derive(Debug)]
pub struct PatchSlot<T> {
    installed: Option<T>,
}

impl<T> PatchSlot<T> {
    pub const fn new() -> Self {
        Self { installed: None }
    }

    pub fn is_applied(&self) -> bool {
        self.installed.is_some()
    }

    /// Runs `install` unless a patch is already in place.
    ///
    /// Returns whether a new patch was installed.
    pub fn apply(&mut self, install: impl FnOnce() -> Result<T>) -> Result<bool> {
        if self.installed.is_some() {
            return Ok(false);
        }
        self.installed = Some(install()?);
        Ok(true)
    }

    /// Runs `uninstall` on the current patch, if any, and clears the slot.
    ///
    /// A failed uninstall leaves the patch recorded. Returns whether a patch
    /// was removed.
    pub fn reset(&mut self, uninstall: impl FnOnce(&T) -> Result<()>) -> Result<bool> {
        match &self.installed {
            None => Ok(false),
            Some(patch) => {
                uninstall(patch)?;
                self.installed = None;
                Ok(true)
            }
        }
    }
}

impl<T> Default for PatchSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The original entry point, kept for restoring.
struct InstalledPatch {
    prototype: JsValue,
    original: Function,
}

thread_local! {
    static GET_CONTEXT_PATCH: RefCell<PatchSlot<InstalledPatch>> = RefCell::new(PatchSlot::new());
}

const WRAPPER_FACTORY: &str = "\
return function getContext(type, options) {\
  const merged = (options !== undefined && options !== null)\
    ? Object.assign({}, options, hdr)\
    : Object.assign({}, hdr);\
  return original.call(this, type, merged);\
};";

fn canvas_prototype() -> Result<JsValue> {
    let ctor = get_property(&js_sys::global(), "HTMLCanvasElement")?;
    if ctor.is_undefined() {
        return Err(HdrCanvasError::Js("HTMLCanvasElement is not available".to_string()));
    }
    get_property(&ctor, "prototype")
}

fn install(options: &ContextOptions) -> Result<InstalledPatch> {
    let prototype = canvas_prototype()?;
    let original: Function = get_property(&prototype, "getContext")?
        .dyn_into()
        .map_err(|_| HdrCanvasError::Js("getContext is not a function".to_string()))?;

    let factory = Function::new_with_args("original, hdr", WRAPPER_FACTORY);
    let wrapper = factory.call2(&JsValue::NULL, &original, &options.to_js_value()?)?;
    Reflect::set(&prototype, &JsValue::from_str("getContext"), &wrapper)?;

    Ok(InstalledPatch {
        prototype,
        original,
    })
}

fn uninstall(patch: &InstalledPatch) -> Result<()> {
    Reflect::set(
        &patch.prototype,
        &JsValue::from_str("getContext"),
        &patch.original,
    )?;
    Ok(())
}

/// Makes every canvas context request default to HDR `options`.
pub fn default_get_context_hdr(options: &ContextOptions) -> Result<()> {
    let applied = GET_CONTEXT_PATCH.with(|slot| slot.borrow_mut().apply(|| install(options)))?;
    if applied {
        tracing::debug!("canvas getContext patched for HDR");
    } else {
        tracing::warn!("canvas getContext is already patched; keeping the existing patch");
    }
    Ok(())
}

/// Restores the original canvas context entry point, if it was patched.
pub fn reset_get_context() -> Result<()> {
    let removed = GET_CONTEXT_PATCH.with(|slot| slot.borrow_mut().reset(uninstall))?;
    if removed {
        tracing::debug!("canvas getContext restored");
    }
    Ok(())
}

/// Whether the global `getContext` override is active.
pub fn is_get_context_patched() -> bool {
    GET_CONTEXT_PATCH.with(|slot| slot.borrow().is_applied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_without_patch_is_noop() {
        assert!(!is_get_context_patched());
        assert!(reset_get_context().is_ok());
        assert!(!is_get_context_patched());
    }

    #[test]
    fn test_slot_applies_once() {
        let mut slot = PatchSlot::new();
        assert_eq!(slot.apply(|| Ok("first")), Ok(true));
        assert_eq!(slot.apply(|| Ok("second")), Ok(false));
        assert!(slot.is_applied());

        let mut removed = Vec::new();
        assert_eq!(
            slot.reset(|p| {
                removed.push(*p);
                Ok(())
            }),
            Ok(true)
        );
        assert_eq!(removed, vec!["first"]);
        assert!(!slot.is_applied());
    }

    #[test]
    fn test_slot_reset_empty() {
        let mut slot: PatchSlot<u8> = PatchSlot::default();
        assert_eq!(slot.reset(|_| panic!("nothing to uninstall")), Ok(false));
    }

    #[test]
    fn test_slot_failed_install_stays_empty() {
        let mut slot: PatchSlot<u8> = PatchSlot::new();
        let err = HdrCanvasError::Js("boom".to_string());
        assert_eq!(slot.apply(|| Err(err.clone())), Err(err));
        assert!(!slot.is_applied());
    }

    #[test]
    fn test_slot_failed_uninstall_keeps_patch() {
        let mut slot = PatchSlot::new();
        slot.apply(|| Ok(1u8)).unwrap();
        assert!(slot
            .reset(|_| Err(HdrCanvasError::Js("read-only".to_string())))
            .is_err());
        assert!(slot.is_applied());
    }
}

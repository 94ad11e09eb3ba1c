use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Slot for an animation callback that reschedules itself.
///
/// The callback captures a clone of its own loop, which is a reference cycle
/// until [`FrameLoop::stop`] empties the slot.
pub struct FrameLoop<F> {
	alive: Rc<Cell<bool>>,
	callback: Rc<RefCell<Option<F>>>,
	pending: Rc<Cell<Option<i32>>>,
}

impl<F> Clone for FrameLoop<F> {
	fn clone(&self) -> Self {
		Self {
			alive: self.alive.clone(),
			callback: self.callback.clone(),
			pending: self.pending.clone(),
		}
	}
}

impl<F> Default for FrameLoop<F> {
	fn default() -> Self {
		Self {
			alive: Rc::new(Cell::new(true)),
			callback: Rc::new(RefCell::new(None)),
			pending: Rc::new(Cell::new(None)),
		}
	}
}

impl<F> FrameLoop<F> {
	pub fn is_alive(&self) -> bool {
		self.alive.get()
	}

	/// Ignored once stopped.
	pub fn install(&self, callback: F) {
		if self.is_alive() {
			*self.callback.borrow_mut() = Some(callback);
		}
	}

	/// Hand the installed callback to `request` and remember the frame handle
	/// it returns.
	pub fn schedule(&self, request: impl FnOnce(&F) -> Option<i32>) {
		if !self.is_alive() {
			return;
		}
		if let Some(cb) = self.callback.borrow().as_ref() {
			self.pending.set(request(cb));
		}
	}

	/// Stop rescheduling and drop the callback. Returns the frame still
	/// pending, so the caller can cancel it.
	pub fn stop(&self) -> Option<i32> {
		self.alive.set(false);
		self.callback.borrow_mut().take();
		self.pending.take()
	}
}

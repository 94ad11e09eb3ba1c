use std::cell::Cell;
use std::rc::Rc;

/// Hands out monotonically increasing request tickets. Only the newest
/// ticket may apply its response.
#[derive(Clone, Debug, Default)]
pub struct FetchSequencer {
	latest: Rc<Cell<u64>>,
}

#[derive(Clone, Debug)]
pub struct FetchTicket {
	seq: u64,
	latest: Rc<Cell<u64>>,
}

impl FetchSequencer {
	/// Start a new request, superseding every ticket issued before it.
	pub fn issue(&self) -> FetchTicket {
		let seq = self.latest.get() + 1;
		self.latest.set(seq);
		FetchTicket {
			seq,
			latest: self.latest.clone(),
		}
	}
}

impl FetchTicket {
	pub fn is_current(&self) -> bool {
		self.latest.get() == self.seq
	}

	pub fn seq(&self) -> u64 {
		self.seq
	}

	/// Await `request`; its output is dropped if a newer ticket was issued
	/// in the meantime.
	pub async fn guard<T>(self, request: impl Future<Output = T>) -> Option<T> {
		let output = request.await;
		self.is_current().then_some(output)
	}
}

//! Accessor generation shared by both session kinds.

/// Generates the property accessors and lifecycle methods shared by both
/// session kinds. The implementing type must provide `fn core(&self) -> &Arc<SessionCore>`.
macro_rules! quick_input_accessors {
	(impl[$($generic:tt)*] $ty:ty) => {
		impl<$($generic)*> $ty {
			/// Process-unique id of this session.
			pub fn id(&self) -> $crate::SessionId {
				self.core().id()
			}

			/// Shows the widget, delivering every property set so far.
			pub fn show(&self) {
				self.core().show();
			}

			/// Hides the widget if it is visible.
			pub fn hide(&self) {
				self.core().hide();
			}

			/// Whether the widget is currently shown.
			pub fn is_visible(&self) -> bool {
				self.core().read(|state| state.visible)
			}

			/// Whether [`Self::dispose`] has run.
			pub fn is_disposed(&self) -> bool {
				self.core().read(|state| state.disposed)
			}

			/// Widget title.
			pub fn title(&self) -> Option<String> {
				self.core().read(|state| state.title.clone())
			}

			/// Sets the widget title.
			pub fn set_title(&self, title: Option<String>) {
				self.core().set_title(title);
			}

			/// Current wizard step.
			pub fn step(&self) -> Option<u32> {
				self.core().read(|state| state.step)
			}

			/// Sets the current wizard step.
			pub fn set_step(&self, step: Option<u32>) {
				self.core().set_step(step);
			}

			/// Number of wizard steps.
			pub fn total_steps(&self) -> Option<u32> {
				self.core().read(|state| state.total_steps)
			}

			/// Sets the number of wizard steps.
			pub fn set_total_steps(&self, total_steps: Option<u32>) {
				self.core().set_total_steps(total_steps);
			}

			/// Whether the widget accepts input.
			pub fn enabled(&self) -> bool {
				self.core().read(|state| state.enabled)
			}

			/// Enables or disables the widget.
			pub fn set_enabled(&self, enabled: bool) {
				self.core().set_enabled(enabled);
			}

			/// Whether a progress indicator is shown.
			pub fn busy(&self) -> bool {
				self.core().read(|state| state.busy)
			}

			/// Shows or hides the progress indicator.
			pub fn set_busy(&self, busy: bool) {
				self.core().set_busy(busy);
			}

			/// Whether the widget stays open when focus moves elsewhere.
			pub fn ignore_focus_out(&self) -> bool {
				self.core().read(|state| state.ignore_focus_out)
			}

			/// Keeps the widget open when focus moves elsewhere.
			pub fn set_ignore_focus_out(&self, ignore_focus_out: bool) {
				self.core().set_ignore_focus_out(ignore_focus_out);
			}

			/// Current text.
			pub fn value(&self) -> String {
				self.core().read(|state| state.value.clone())
			}

			/// Replaces the text.
			pub fn set_value(&self, value: impl Into<String>) {
				self.core().set_value(value.into());
			}

			/// Hint shown while the field is empty.
			pub fn placeholder(&self) -> Option<String> {
				self.core().read(|state| state.placeholder.clone())
			}

			/// Sets the hint shown while the field is empty.
			pub fn set_placeholder(&self, placeholder: Option<String>) {
				self.core().set_placeholder(placeholder);
			}

			/// Toolbar buttons.
			pub fn buttons(&self) -> Vec<$crate::QuickInputButton> {
				self.core().read(|state| state.buttons.clone())
			}

			/// Replaces the toolbar buttons.
			pub fn set_buttons(&self, buttons: Vec<$crate::QuickInputButton>) {
				self.core().set_buttons(buttons);
			}

			/// Fires when the widget is hidden, by the host or by disposal.
			pub fn on_did_hide(&self) -> $crate::EventReceiver<()> {
				self.core().on_did_hide.subscribe()
			}

			/// Fires when the user commits.
			pub fn on_did_accept(&self) -> $crate::EventReceiver<()> {
				self.core().on_did_accept.subscribe()
			}

			/// Fires with the new text whenever the user types.
			pub fn on_did_change_value(&self) -> $crate::EventReceiver<String> {
				self.core().on_did_change_value.subscribe()
			}

			/// Fires with the pressed toolbar button.
			pub fn on_did_trigger_button(&self) -> $crate::EventReceiver<$crate::QuickInputButton> {
				self.core().on_did_trigger_button.subscribe()
			}
		}
	};
}

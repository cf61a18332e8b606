//! Dialog shell shared by the editor's pop-ups.

use yew::prelude::*;
use yew_icons::{Icon, IconData};

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    /// Visibility; the modal closes itself by setting it to false.
    pub state: UseStateHandle<bool>,
    pub children: Children,
    #[prop_or_default]
    pub title: Option<AttrValue>,
    /// Buttons rendered below the content.
    #[prop_or_default]
    pub footer: Option<Html>,
    #[prop_or_default]
    pub onclose: Option<Callback<()>>,
    #[prop_or(true)]
    pub overlay_click_closes: bool,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    let close = {
        let state = props.state.clone();
        let onclose = props.onclose.clone();
        move || {
            state.set(false);
            if let Some(cb) = onclose.as_ref() {
                cb.emit(());
            }
        }
    };

    let on_overlay_click = {
        let close = close.clone();
        let overlay_click_closes = props.overlay_click_closes;
        Callback::from(move |_: MouseEvent| {
            if overlay_click_closes {
                close();
            }
        })
    };

    // Clicks inside the dialog must not reach the overlay
    let on_modal_click = Callback::from(|e: MouseEvent| e.stop_propagation());

    let on_close_click = Callback::from(move |_: MouseEvent| close());

    if !*props.state {
        return html! {};
    }

    html! {
        <div class="modal-overlay" onclick={on_overlay_click}>
            <div class={classes!("modal", props.class.clone())} onclick={on_modal_click}>
                <div class="modal-header">
                    if let Some(title) = props.title.clone() {
                        <h2>{ title }</h2>
                    }
                    <button class="modal-close-btn" title="Close" onclick={on_close_click}>
                        <Icon data={IconData::LUCIDE_X} width="16px" height="16px" />
                    </button>
                </div>
                <div class="modal-content">
                    { for props.children.iter() }
                </div>
                if let Some(footer) = props.footer.clone() {
                    <div class="modal-footer">{ footer }</div>
                }
            </div>
        </div>
    }
}

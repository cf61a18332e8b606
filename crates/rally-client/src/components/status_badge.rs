use rally_core::AnalysisStatus;
use yew::prelude::*;
use yew_icons::{Icon, IconData};

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
    pub status: AnalysisStatus,
}

/// Pill showing the analysis state.
#[function_component(StatusBadge)]
pub fn status_badge(props: &StatusBadgeProps) -> Html {
    let icon = match props.status {
        AnalysisStatus::Completed => IconData::LUCIDE_CHECK,
        AnalysisStatus::Processing => IconData::LUCIDE_REFRESH_CW,
        AnalysisStatus::Failed => IconData::LUCIDE_X,
        AnalysisStatus::Pending => IconData::LUCIDE_TIMER,
    };
    let status = props.status.as_str();

    html! {
        <div class={classes!("status-badge", format!("status-{status}"))}>
            <Icon data={icon} width="14px" height="14px" />
            <span>{ status }</span>
        </div>
    }
}

use serde::Serialize;

/// Category understood by the notification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NoticeKind {
    Baneo,
    Advertencia,
    Info,
    Bienvenida,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Baneo => "BANEO",
            NoticeKind::Advertencia => "ADVERTENCIA",
            NoticeKind::Info => "INFO",
            NoticeKind::Bienvenida => "BIENVENIDA",
        }
    }
}

/// Message handed to the notification service; the sender keeps no record of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationNotice {
    pub target_user_id: i64,
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

impl ModerationNotice {
    /// Sent to a user when an administrator suspends their account.
    pub fn account_suspended(target_user_id: i64, reason: &str) -> Self {
        Self {
            target_user_id,
            kind: NoticeKind::Baneo,
            title: "Cuenta Suspendida".to_string(),
            body: format!(
                "Tu cuenta ha sido suspendida por un administrador. Motivo: {reason}"
            ),
        }
    }

    /// Sent to an author whose post an administrator removed.
    pub fn post_removed(target_user_id: i64, post_title: &str, reason: &str) -> Self {
        Self {
            target_user_id,
            kind: NoticeKind::Advertencia,
            title: "Post eliminado".to_string(),
            body: format!(
                "Tu post '{post_title}' fue eliminado por un administrador. Motivo: {reason}"
            ),
        }
    }

    pub(crate) fn to_wire(&self) -> NoticePayload<'_> {
        NoticePayload {
            user_id: self.target_user_id,
            tipo: self.kind,
            titulo: &self.title,
            mensaje: &self.body,
        }
    }
}

/// Body of `POST /api/notifications/create`.
#[derive(Debug, Serialize)]
pub(crate) struct NoticePayload<'a> {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub tipo: NoticeKind,
    pub titulo: &'a str,
    pub mensaje: &'a str,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ban_notice_text() {
        let n = ModerationNotice::account_suspended(9, "spam");
        assert_eq!(n.kind, NoticeKind::Baneo);
        assert_eq!(n.title, "Cuenta Suspendida");
        assert_eq!(
            n.body,
            "Tu cuenta ha sido suspendida por un administrador. Motivo: spam"
        );
    }

    #[test]
    fn wire_shape() {
        let n = ModerationNotice::post_removed(9, "Hola", "off-topic");
        let value = serde_json::to_value(n.to_wire()).unwrap();
        assert_eq!(
            value,
            json!({
                "userId": 9,
                "tipo": "ADVERTENCIA",
                "titulo": "Post eliminado",
                "mensaje": "Tu post 'Hola' fue eliminado por un administrador. Motivo: off-topic"
            })
        );
    }

    #[test]
    fn kind_wire_values_match_as_str() {
        for kind in [
            NoticeKind::Baneo,
            NoticeKind::Advertencia,
            NoticeKind::Info,
            NoticeKind::Bienvenida,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }
}

//! Diffusion interne des changements d'état d'authentification.
//!
//! Les connexions, inscriptions et déconnexions publient un événement;
//! s'abonner rend un récepteur qui cesse d'écouter dès qu'il est lâché.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { email: String },
    SignedOut,
}

#[derive(Debug, Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    /// L'absence d'abonné n'est pas une erreur: l'événement est simplement
    /// perdu, comme un callback jamais enregistré.
    pub fn publish(&self, event: AuthEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let events = AuthEvents::new();
        let mut rx = events.subscribe();

        events.publish(AuthEvent::SignedIn {
            email: "admin@example.com".to_string(),
        });
        events.publish(AuthEvent::SignedOut);

        assert_eq!(
            rx.recv().await.unwrap(),
            AuthEvent::SignedIn {
                email: "admin@example.com".to_string()
            }
        );
        assert_eq!(rx.recv().await.unwrap(), AuthEvent::SignedOut);
    }

    #[tokio::test]
    async fn dropping_the_receiver_unsubscribes() {
        let events = AuthEvents::new();
        let rx = events.subscribe();
        drop(rx);

        // plus personne n'écoute; publier reste sans effet
        events.publish(AuthEvent::SignedOut);
    }
}

use crate::tests::recording_handle;
use crate::{ConnectionHandle, DispatchConfig, Dispatcher, Event, Metrics, SessionIdentity};

#[test]
fn given_registered_session_when_guard_dropped_then_exactly_one_unregister_queued() {
    let (mut dispatcher, dispatch) = Dispatcher::new(DispatchConfig::default(), Metrics::new());
    let (handle, recorder) = recording_handle();
    let connection_id = handle.connection_id();

    let guard = dispatch
        .register(SessionIdentity::new("acme", "alice"), handle)
        .unwrap();
    assert_eq!(guard.connection_id(), connection_id);
    assert_eq!(guard.identity(), &SessionIdentity::new("acme", "alice"));

    let registration = dispatcher.register_rx_for_test().try_recv().unwrap();
    dispatcher.apply(Event::Register(registration));
    assert!(dispatcher.registry().contains("acme", "alice"));

    drop(guard);

    let unregistration = dispatcher.unregister_rx_for_test().try_recv().unwrap();
    assert_eq!(unregistration.connection_id, connection_id);
    assert!(dispatcher.unregister_rx_for_test().try_recv().is_err());

    dispatcher.apply(Event::Unregister(unregistration));
    assert!(dispatcher.registry().is_empty());
    assert!(recorder.is_closed());
}

#[test]
fn given_panicking_session_when_unwinding_then_guard_still_unregisters() {
    let (mut dispatcher, dispatch) = Dispatcher::new(DispatchConfig::default(), Metrics::new());
    let (handle, _) = recording_handle();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = dispatch
            .register(SessionIdentity::new("acme", "alice"), handle)
            .unwrap();
        panic!("session blew up");
    }));

    assert!(result.is_err());
    assert!(dispatcher.unregister_rx_for_test().try_recv().is_ok());
}

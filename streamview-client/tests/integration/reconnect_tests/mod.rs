mod test_transport_failure_reconnects;

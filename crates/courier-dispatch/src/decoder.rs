//! ---
//! courier_section: "03-dispatch"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Content negotiating payload decoding."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Payload decoding guarded by the `Content-Type` header.
//!
//! A declared content type that differs from the decoder's tag skips
//! decoding entirely. A missing content type is reported and decoding is
//! attempted anyway. Either a mismatch or a decode failure ends at the
//! fallback handler, and only a successful decode reaches the continuation.
use std::fmt;
use std::sync::Arc;

use courier_envelope::{Envelope, PayloadDecoder};

use crate::handler::{boxed, do_nothing, BoxedHandler, EnvelopeHandler};
use crate::observer::{default_observer, DispatchEvent, DispatchObserver, SharedObserver};

/// Decoder bound to one content-type tag plus a fallback handler.
#[derive(Clone)]
pub struct ContentNegotiatingDecoder<D> {
    decoder: D,
    fallback: BoxedHandler,
    observer: SharedObserver,
}

impl<D: PayloadDecoder> ContentNegotiatingDecoder<D> {
    /// Wrap `decoder`; failures do nothing until a fallback is set.
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            fallback: boxed(do_nothing),
            observer: default_observer(),
        }
    }

    /// Handler receiving the original envelope on mismatch or decode failure.
    pub fn with_fallback(mut self, handler: impl EnvelopeHandler + 'static) -> Self {
        self.fallback = boxed(handler);
        self
    }

    pub fn observed_by(mut self, observer: impl DispatchObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Tag of the bound decoder.
    pub fn content_type(&self) -> &str {
        self.decoder.content_type()
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Decode the payload of `envelope` and hand it to `continuation`.
    ///
    /// Decoding errors are consumed here. The result is the one returned by
    /// whichever of `continuation` or the fallback ran.
    pub fn decode_and_continue<C>(
        &self,
        envelope: &Envelope,
        continuation: C,
    ) -> anyhow::Result<()>
    where
        C: FnOnce(D::Output, &Envelope) -> anyhow::Result<()>,
    {
        let expected = self.decoder.content_type();
        match envelope.content_type() {
            Some(found) if found != expected => {
                self.observer.observe(&DispatchEvent::ContentTypeMismatch {
                    envelope_id: envelope.id(),
                    expected,
                    found,
                });
                return self.fallback.handle(envelope);
            }
            Some(_) => {}
            None => self.observer.observe(&DispatchEvent::MissingContentType {
                envelope_id: envelope.id(),
                expected,
            }),
        }

        match self.decoder.decode(envelope.payload()) {
            Ok(value) => {
                self.observer.observe(&DispatchEvent::Decoded {
                    envelope_id: envelope.id(),
                    content_type: expected,
                });
                continuation(value, envelope)
            }
            Err(error) => {
                self.observer.observe(&DispatchEvent::DecodeFailed {
                    envelope_id: envelope.id(),
                    error: &error,
                });
                self.fallback.handle(envelope)
            }
        }
    }

    /// Turn this decoder and a fixed continuation into an [`EnvelopeHandler`].
    pub fn and_then<C>(self, continuation: C) -> DecodingHandler<D, C>
    where
        C: Fn(D::Output, &Envelope) -> anyhow::Result<()> + Send + Sync,
    {
        DecodingHandler {
            decoder: self,
            continuation,
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for ContentNegotiatingDecoder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentNegotiatingDecoder")
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}

/// Handler that decodes every envelope it receives before running a
/// continuation. Usable as an entry in a dispatch table.
#[derive(Clone)]
pub struct DecodingHandler<D, C> {
    decoder: ContentNegotiatingDecoder<D>,
    continuation: C,
}

impl<D: PayloadDecoder, C> DecodingHandler<D, C> {
    pub fn content_type(&self) -> &str {
        self.decoder.content_type()
    }
}

impl<D, C> EnvelopeHandler for DecodingHandler<D, C>
where
    D: PayloadDecoder + Send + Sync,
    C: Fn(D::Output, &Envelope) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, envelope: &Envelope) -> anyhow::Result<()> {
        self.decoder.decode_and_continue(envelope, &self.continuation)
    }
}

impl<D: fmt::Debug, C> fmt::Debug for DecodingHandler<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodingHandler")
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}

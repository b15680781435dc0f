use crossbeam_channel::{bounded, Receiver, Sender};
use crate::core::e3d::error::E3dFault;
use crate::core::e3d::vertex::Viewport;
use crate::core::fixed::Fixed12;

pub const DEFAULT_QUEUE_CAPACITY : usize = 1024;

/// Commands sent by the geometry coprocessor to the rendering engine
#[derive(Debug,Clone,PartialEq)]
pub enum E3dCommand {
    SetViewport(Viewport),
    /// vertex in clip space
    Vertex { x: Fixed12, y: Fixed12, z: Fixed12, w: Fixed12 },
    /// 3 or 4 indices in the Vertex RAM of the frame being built. Bit 31 of attr marks a quad.
    Polygon { vtx: [usize;4], attr: u32 },
    SwapBuffers,
}

/// Producer side of the command FIFO. Blocks when the FIFO is full.
#[derive(Debug,Clone)]
pub struct E3dSender {
    tx: Sender<E3dCommand>,
}

impl E3dSender {
    pub fn send(&self,cmd:E3dCommand) -> Result<(),E3dFault> {
        self.tx.send(cmd).map_err(|_| E3dFault::EngineHalted)
    }
}

pub fn channel(capacity:usize) -> (E3dSender,Receiver<E3dCommand>) {
    let (tx,rx) = bounded(capacity);
    (E3dSender { tx },rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_commands_are_received_in_order() {
        let (tx,rx) = channel(4);
        let producer = thread::spawn(move || {
            for i in 0..100 {
                tx.send(E3dCommand::Polygon { vtx: [i,0,0,0], attr: 0 }).unwrap();
            }
            tx.send(E3dCommand::SwapBuffers).unwrap();
        });
        for i in 0..100 {
            match rx.recv().unwrap() {
                E3dCommand::Polygon { vtx, .. } => assert_eq!(vtx[0],i),
                cmd => panic!("unexpected command {:?}",cmd),
            }
        }
        assert_eq!(rx.recv().unwrap(),E3dCommand::SwapBuffers);
        producer.join().unwrap();
    }

    #[test]
    fn test_fifo_is_bounded() {
        let (tx,_rx) = channel(2);
        tx.send(E3dCommand::SwapBuffers).unwrap();
        tx.send(E3dCommand::SwapBuffers).unwrap();
        assert!(tx.tx.try_send(E3dCommand::SwapBuffers).is_err());
    }

    #[test]
    fn test_send_after_consumer_dropped() {
        let (tx,rx) = channel(2);
        drop(rx);
        assert_eq!(tx.send(E3dCommand::SwapBuffers),Err(E3dFault::EngineHalted));
    }
}
